//! Customer domain types.

use sqlx::FromRow;

use ledgerboard_core::{Cents, CustomerId, Email};

/// A customer as edited through the dashboard forms.
#[derive(Debug, Clone, FromRow)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Customer name.
    pub name: String,
    /// Contact email.
    pub email: Email,
    /// Avatar image path.
    pub image_url: String,
}

/// Minimal customer identity for the invoice form's selector.
#[derive(Debug, Clone, FromRow)]
pub struct CustomerName {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Customer name.
    pub name: String,
}

/// A customer listing row with aggregated invoice totals.
#[derive(Debug, Clone, FromRow)]
pub struct CustomerWithTotals {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Customer name.
    pub name: String,
    /// Contact email.
    pub email: Email,
    /// Avatar image path.
    pub image_url: String,
    /// Number of invoices issued to this customer.
    pub total_invoices: i64,
    /// Sum of this customer's pending invoice amounts.
    pub total_pending: Cents,
    /// Sum of this customer's paid invoice amounts.
    pub total_paid: Cents,
}
