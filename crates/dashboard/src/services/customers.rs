//! Customer mutations and listing queries.

use std::sync::Arc;

use ledgerboard_core::{CustomerId, TenantId};
use sqlx::PgPool;
use tracing::{debug, error, instrument};

use crate::cache::{CustomerListingKey, ListingCache, ListingRoute};
use crate::db::{CustomerRepository, RepositoryError};
use crate::forms::CustomerForm;
use crate::models::{CurrentUser, Customer, CustomerWithTotals};
use crate::services::auth::{AuthError, AuthService};
use crate::services::{MutationOutcome, ServiceError};

/// Image path stored for every new customer; client input never controls it.
const DEFAULT_AVATAR: &str = "/static/customers/default-avatar.svg";

/// Customer service: validated mutations plus the tenant-scoped reads behind
/// the customer pages.
pub struct CustomerService<'a> {
    auth: AuthService<'a>,
    customers: CustomerRepository<'a>,
    cache: &'a ListingCache,
}

impl<'a> CustomerService<'a> {
    /// Create a new customer service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, cache: &'a ListingCache) -> Self {
        Self {
            auth: AuthService::new(pool),
            customers: CustomerRepository::new(pool),
            cache,
        }
    }

    /// Create a customer from a submitted form.
    #[instrument(skip(self, claim, form))]
    pub async fn create(
        &self,
        claim: Option<&CurrentUser>,
        form: &CustomerForm,
    ) -> MutationOutcome {
        let payload = match form.validate() {
            Ok(payload) => payload,
            Err(errors) => {
                return MutationOutcome::Invalid {
                    errors,
                    message: "Missing fields. Failed to create customer.".to_owned(),
                };
            }
        };

        let tenant = match self.resolve(claim, "failed to create customer.").await {
            Ok(tenant) => tenant,
            Err(outcome) => return outcome,
        };

        if let Err(e) = self
            .customers
            .insert(tenant, &payload.name, &payload.email, DEFAULT_AVATAR)
            .await
        {
            error!(error = %e, "customer insert failed");
            return MutationOutcome::Failed {
                message: "Database error: failed to create customer.".to_owned(),
            };
        }

        self.cache.invalidate(ListingRoute::Customers).await;
        MutationOutcome::Success {
            redirect_to: "/dashboard/customers",
        }
    }

    /// Update a customer's name and email from a submitted form.
    ///
    /// Zero affected rows is a success: the id either no longer exists or
    /// belongs to another tenant, and neither case is distinguished.
    #[instrument(skip(self, claim, form), fields(id = %id))]
    pub async fn update(
        &self,
        claim: Option<&CurrentUser>,
        id: CustomerId,
        form: &CustomerForm,
    ) -> MutationOutcome {
        let payload = match form.validate() {
            Ok(payload) => payload,
            Err(errors) => {
                return MutationOutcome::Invalid {
                    errors,
                    message: "Missing fields. Failed to update customer.".to_owned(),
                };
            }
        };

        let tenant = match self.resolve(claim, "failed to update customer.").await {
            Ok(tenant) => tenant,
            Err(outcome) => return outcome,
        };

        if let Err(e) = self
            .customers
            .update(tenant, id, &payload.name, &payload.email)
            .await
        {
            error!(error = %e, "customer update failed");
            return MutationOutcome::Failed {
                message: "Database error: failed to update customer.".to_owned(),
            };
        }

        self.cache.invalidate(ListingRoute::Customers).await;
        MutationOutcome::Success {
            redirect_to: "/dashboard/customers",
        }
    }

    /// Delete a customer. Deleting an id that is absent or foreign-owned is a
    /// no-op success; a customer that still has invoices cannot be deleted.
    #[instrument(skip(self, claim), fields(id = %id))]
    pub async fn delete(&self, claim: Option<&CurrentUser>, id: CustomerId) -> MutationOutcome {
        let tenant = match self.resolve(claim, "failed to delete customer.").await {
            Ok(tenant) => tenant,
            Err(outcome) => return outcome,
        };

        match self.customers.delete(tenant, id).await {
            Ok(_) => {}
            Err(RepositoryError::Database(sqlx::Error::Database(db_err)))
                if db_err.is_foreign_key_violation() =>
            {
                return MutationOutcome::Failed {
                    message: "Cannot delete a customer that still has invoices.".to_owned(),
                };
            }
            Err(e) => {
                error!(error = %e, "customer delete failed");
                return MutationOutcome::Failed {
                    message: "Database error: failed to delete customer.".to_owned(),
                };
            }
        }

        self.cache.invalidate(ListingRoute::Customers).await;
        MutationOutcome::Success {
            redirect_to: "/dashboard/customers",
        }
    }

    /// The filtered customer listing with per-status invoice totals, served
    /// from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if the tenant cannot be resolved or the query
    /// fails.
    #[instrument(skip(self, claim))]
    pub async fn listing(
        &self,
        claim: Option<&CurrentUser>,
        query: &str,
    ) -> Result<Arc<Vec<CustomerWithTotals>>, ServiceError> {
        let tenant = self.auth.resolve_tenant(claim).await?;

        let key = CustomerListingKey {
            tenant,
            query: query.to_owned(),
        };
        if let Some(cached) = self.cache.get_customers(&key).await {
            debug!("Cache hit for customer listing");
            return Ok(cached);
        }

        let customers = Arc::new(self.customers.list_filtered(tenant, query).await?);
        self.cache
            .insert_customers(key, Arc::clone(&customers))
            .await;

        Ok(customers)
    }

    /// Fetch one customer for the edit form. `None` when the id does not
    /// resolve under this tenant.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if the tenant cannot be resolved or the query
    /// fails.
    pub async fn find(
        &self,
        claim: Option<&CurrentUser>,
        id: CustomerId,
    ) -> Result<Option<Customer>, ServiceError> {
        let tenant = self.auth.resolve_tenant(claim).await?;
        let customer = self.customers.find_by_id(tenant, id).await?;
        Ok(customer)
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
