//! Overview page queries.

use sqlx::PgPool;
use tracing::instrument;

use ledgerboard_core::Cents;

use crate::db::{CustomerRepository, InvoiceRepository};
use crate::models::{CurrentUser, LatestInvoice};
use crate::services::ServiceError;
use crate::services::auth::AuthService;

/// Aggregates shown on the overview cards.
#[derive(Debug, Clone, Copy)]
pub struct CardData {
    pub invoice_count: i64,
    pub customer_count: i64,
    pub total_paid: Cents,
    pub total_pending: Cents,
}

/// Dashboard service: the overview page's aggregate reads.
pub struct DashboardService<'a> {
    auth: AuthService<'a>,
    invoices: InvoiceRepository<'a>,
    customers: CustomerRepository<'a>,
}

impl<'a> DashboardService<'a> {
    /// Create a new dashboard service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            auth: AuthService::new(pool),
            invoices: InvoiceRepository::new(pool),
            customers: CustomerRepository::new(pool),
        }
    }

    /// The three card aggregates, issued concurrently and awaited jointly.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if the tenant cannot be resolved or any of the
    /// aggregates fails.
    #[instrument(skip(self, claim))]
    pub async fn card_data(&self, claim: Option<&CurrentUser>) -> Result<CardData, ServiceError> {
        let tenant = self.auth.resolve_tenant(claim).await?;

        let (invoice_count, customer_count, totals) = tokio::try_join!(
            self.invoices.count(tenant),
            self.customers.count(tenant),
            self.invoices.status_totals(tenant),
        )?;

        Ok(CardData {
            invoice_count,
            customer_count,
            total_paid: totals.paid,
            total_pending: totals.pending,
        })
    }

    /// The five most recent invoices with customer display fields.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if the tenant cannot be resolved or the query
    /// fails.
    #[instrument(skip(self, claim))]
    pub async fn latest_invoices(
        &self,
        claim: Option<&CurrentUser>,
    ) -> Result<Vec<LatestInvoice>, ServiceError> {
        let tenant = self.auth.resolve_tenant(claim).await?;
        let invoices = self.invoices.latest(tenant).await?;
        Ok(invoices)
    }
}
