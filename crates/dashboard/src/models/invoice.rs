//! Invoice domain types.

use chrono::NaiveDate;
use sqlx::FromRow;

use ledgerboard_core::{Cents, CustomerId, Email, InvoiceId, InvoiceStatus};

/// An invoice as loaded for the edit form.
#[derive(Debug, Clone, FromRow)]
pub struct Invoice {
    /// Unique invoice ID.
    pub id: InvoiceId,
    /// Customer the invoice was issued to.
    pub customer_id: CustomerId,
    /// Amount in cents.
    pub amount: Cents,
    /// Payment status.
    pub status: InvoiceStatus,
}

/// An invoice listing row joined with customer display fields.
#[derive(Debug, Clone, FromRow)]
pub struct InvoiceWithCustomer {
    /// Unique invoice ID.
    pub id: InvoiceId,
    /// Amount in cents.
    pub amount: Cents,
    /// Issue date.
    pub date: NaiveDate,
    /// Payment status.
    pub status: InvoiceStatus,
    /// Customer name.
    pub name: String,
    /// Customer contact email.
    pub email: Email,
    /// Customer avatar image path.
    pub image_url: String,
}

/// A recent invoice for the dashboard overview.
#[derive(Debug, Clone, FromRow)]
pub struct LatestInvoice {
    /// Unique invoice ID.
    pub id: InvoiceId,
    /// Amount in cents.
    pub amount: Cents,
    /// Customer name.
    pub name: String,
    /// Customer avatar image path.
    pub image_url: String,
    /// Customer contact email.
    pub email: Email,
}

/// Paid/pending sums across a tenant's invoices.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct StatusTotals {
    /// Sum of paid invoice amounts.
    pub paid: Cents,
    /// Sum of pending invoice amounts.
    pub pending: Cents,
}
