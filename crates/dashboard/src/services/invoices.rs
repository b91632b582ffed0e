//! Invoice mutations and listing queries.

use std::sync::Arc;

use ledgerboard_core::{InvoiceId, TenantId};
use sqlx::PgPool;
use tracing::{debug, error, instrument};

use crate::cache::{InvoiceListingKey, InvoicePage, ListingCache, ListingRoute};
use crate::db::invoices::PAGE_SIZE;
use crate::db::{CustomerRepository, InvoiceRepository};
use crate::forms::{FieldErrors, InvoiceForm};
use crate::models::{CurrentUser, CustomerName, Invoice};
use crate::services::auth::{AuthError, AuthService};
use crate::services::{MutationOutcome, ServiceError};

/// Invoice service: validated mutations plus the tenant-scoped reads behind
/// the invoice pages.
pub struct InvoiceService<'a> {
    auth: AuthService<'a>,
    invoices: InvoiceRepository<'a>,
    customers: CustomerRepository<'a>,
    cache: &'a ListingCache,
}

impl<'a> InvoiceService<'a> {
    /// Create a new invoice service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, cache: &'a ListingCache) -> Self {
        Self {
            auth: AuthService::new(pool),
            invoices: InvoiceRepository::new(pool),
            customers: CustomerRepository::new(pool),
            cache,
        }
    }

    /// Create an invoice from a submitted form.
    ///
    /// Validation runs first and reports every violation; only a clean form
    /// reaches tenant resolution and the single insert statement.
    #[instrument(skip(self, claim, form))]
    pub async fn create(&self, claim: Option<&CurrentUser>, form: &InvoiceForm) -> MutationOutcome {
        let payload = match form.validate() {
            Ok(payload) => payload,
            Err(errors) => {
                return MutationOutcome::Invalid {
                    errors,
                    message: "Missing fields. Failed to create invoice.".to_owned(),
                };
            }
        };

        let tenant = match self.resolve(claim, "failed to create invoice.").await {
            Ok(tenant) => tenant,
            Err(outcome) => return outcome,
        };

        let written = match self
            .invoices
            .insert(tenant, payload.customer_id, payload.amount, payload.status)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "invoice insert failed");
                return MutationOutcome::Failed {
                    message: "Database error: failed to create invoice.".to_owned(),
                };
            }
        };

        // The insert is guarded by customer ownership; zero rows means the
        // selected customer is not this tenant's.
        if written == 0 {
            let mut errors = FieldErrors::default();
            errors.push("customer_id", "Please select a customer.");
            return MutationOutcome::Invalid {
                errors,
                message: "Missing fields. Failed to create invoice.".to_owned(),
            };
        }

        self.cache.invalidate(ListingRoute::Invoices).await;
        MutationOutcome::Success {
            redirect_to: "/dashboard/invoices",
        }
    }

    /// Update an invoice from a submitted form.
    ///
    /// Zero affected rows is a success: the id either no longer exists or
    /// belongs to another tenant, and neither case is distinguished.
    #[instrument(skip(self, claim, form), fields(id = %id))]
    pub async fn update(
        &self,
        claim: Option<&CurrentUser>,
        id: InvoiceId,
        form: &InvoiceForm,
    ) -> MutationOutcome {
        let payload = match form.validate() {
            Ok(payload) => payload,
            Err(errors) => {
                return MutationOutcome::Invalid {
                    errors,
                    message: "Missing fields. Failed to update invoice.".to_owned(),
                };
            }
        };

        let tenant = match self.resolve(claim, "failed to update invoice.").await {
            Ok(tenant) => tenant,
            Err(outcome) => return outcome,
        };

        if let Err(e) = self
            .invoices
            .update(tenant, id, payload.customer_id, payload.amount, payload.status)
            .await
        {
            error!(error = %e, "invoice update failed");
            return MutationOutcome::Failed {
                message: "Database error: failed to update invoice.".to_owned(),
            };
        }

        self.cache.invalidate(ListingRoute::Invoices).await;
        MutationOutcome::Success {
            redirect_to: "/dashboard/invoices",
        }
    }

    /// Delete an invoice. Deleting an id that is absent or foreign-owned is a
    /// no-op success.
    #[instrument(skip(self, claim), fields(id = %id))]
    pub async fn delete(&self, claim: Option<&CurrentUser>, id: InvoiceId) -> MutationOutcome {
        let tenant = match self.resolve(claim, "failed to delete invoice.").await {
            Ok(tenant) => tenant,
            Err(outcome) => return outcome,
        };

        if let Err(e) = self.invoices.delete(tenant, id).await {
            error!(error = %e, "invoice delete failed");
            return MutationOutcome::Failed {
                message: "Database error: failed to delete invoice.".to_owned(),
            };
        }

        self.cache.invalidate(ListingRoute::Invoices).await;
        MutationOutcome::Success {
            redirect_to: "/dashboard/invoices",
        }
    }

    /// One page of the filtered listing, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if the tenant cannot be resolved or a query
    /// fails.
    #[instrument(skip(self, claim), fields(page = page))]
    pub async fn listing(
        &self,
        claim: Option<&CurrentUser>,
        query: &str,
        page: i64,
    ) -> Result<InvoicePage, ServiceError> {
        let tenant = self.auth.resolve_tenant(claim).await?;

        let key = InvoiceListingKey {
            tenant,
            query: query.to_owned(),
            page,
        };
        if let Some(cached) = self.cache.get_invoices(&key).await {
            debug!("Cache hit for invoice listing");
            return Ok(cached);
        }

        let rows = self.invoices.list_filtered(tenant, query, page).await?;
        let matching = self.invoices.count_filtered(tenant, query).await?;

        let listing = InvoicePage {
            rows: Arc::new(rows),
            total_pages: matching
                .cast_unsigned()
                .div_ceil(PAGE_SIZE.cast_unsigned())
                .cast_signed(),
        };
        self.cache.insert_invoices(key, listing.clone()).await;

        Ok(listing)
    }

    /// Fetch one invoice for the edit form. `None` when the id does not
    /// resolve under this tenant.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if the tenant cannot be resolved or the query
    /// fails.
    pub async fn find(
        &self,
        claim: Option<&CurrentUser>,
        id: InvoiceId,
    ) -> Result<Option<Invoice>, ServiceError> {
        let tenant = self.auth.resolve_tenant(claim).await?;
        let invoice = self.invoices.find_by_id(tenant, id).await?;
        Ok(invoice)
    }

    /// Customer id/name pairs for the invoice form selector.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if the tenant cannot be resolved or the query
    /// fails.
    pub async fn customer_names(
        &self,
        claim: Option<&CurrentUser>,
    ) -> Result<Vec<CustomerName>, ServiceError> {
        let tenant = self.auth.resolve_tenant(claim).await?;
        let names = self.customers.list_names(tenant).await?;
        Ok(names)
    }

    /// Resolve the tenant for a mutation, turning failures into the outcome
    /// the handler renders.
    async fn resolve(
        &self,
        claim: Option<&CurrentUser>,
        failure: &str,
    ) -> Result<TenantId, MutationOutcome> {
        match self.auth.resolve_tenant(claim).await {
            Ok(tenant) => Ok(tenant),
            Err(AuthError::Repository(e)) => {
                error!(error = %e, "tenant resolution failed");
                Err(MutationOutcome::Failed {
                    message: format!("Database error: {failure}"),
                })
            }
            Err(e) => Err(MutationOutcome::Failed {
                message: e.user_message().to_owned(),
            }),
        }
    }
}
