//! Customer storage, always scoped to a single tenant.

use ledgerboard_core::{CustomerId, Email, TenantId};
use sqlx::PgPool;

use crate::db::{RepositoryError, like_pattern};
use crate::models::{Customer, CustomerName, CustomerWithTotals};

/// Repository for customer operations.
///
/// Every statement carries the tenant id; there is no way to reach another
/// tenant's rows through this type.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new repository backed by the given pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a customer for the tenant, stamping the creation time server-side.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(
        &self,
        tenant: TenantId,
        name: &str,
        email: &Email,
        image_url: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO customers (name, email, image_url, user_id, date)
            VALUES ($1, $2, $3, $4, NOW())
            ",
        )
        .bind(name)
        .bind(email.as_str())
        .bind(image_url)
        .bind(tenant.as_uuid())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Update a customer's name and email, refreshing the record timestamp.
    ///
    /// Returns the number of affected rows. Zero means the customer does not
    /// exist under this tenant; the image URL is left untouched either way.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        tenant: TenantId,
        id: CustomerId,
        name: &str,
        email: &Email,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE customers
            SET name = $1, email = $2, date = NOW()
            WHERE id = $3 AND user_id = $4
            ",
        )
        .bind(name)
        .bind(email.as_str())
        .bind(id.as_uuid())
        .bind(tenant.as_uuid())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete a customer. Returns the number of affected rows; zero when the
    /// row is absent or owned by another tenant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, tenant: TenantId, id: CustomerId) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM customers
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id.as_uuid())
        .bind(tenant.as_uuid())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Fetch a single customer by id, or `None` when the id does not resolve
    /// under this tenant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(
        &self,
        tenant: TenantId,
        id: CustomerId,
    ) -> Result<Option<Customer>, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            r"
            SELECT id, name, email, image_url
            FROM customers
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id.as_uuid())
        .bind(tenant.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        Ok(customer)
    }

    /// List the tenant's customers as id/name pairs for form selectors,
    /// ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_names(&self, tenant: TenantId) -> Result<Vec<CustomerName>, RepositoryError> {
        let names = sqlx::query_as::<_, CustomerName>(
            r"
            SELECT id, name
            FROM customers
            WHERE user_id = $1
            ORDER BY name ASC
            ",
        )
        .bind(tenant.as_uuid())
        .fetch_all(self.pool)
        .await?;

        Ok(names)
    }

    /// List the tenant's customers with per-status invoice totals, filtered by
    /// a case-insensitive substring match on name or email.
    ///
    /// The result is unpaginated and ordered by name. Sums are cast to
    /// `BIGINT` because `SUM` over a `BIGINT` column widens to `NUMERIC`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_filtered(
        &self,
        tenant: TenantId,
        query: &str,
    ) -> Result<Vec<CustomerWithTotals>, RepositoryError> {
        let customers = sqlx::query_as::<_, CustomerWithTotals>(
            r"
            SELECT customers.id, customers.name, customers.email, customers.image_url,
                   COUNT(invoices.id) AS total_invoices,
                   COALESCE(SUM(CASE WHEN invoices.status = 'pending' THEN invoices.amount ELSE 0 END), 0)::BIGINT AS total_pending,
                   COALESCE(SUM(CASE WHEN invoices.status = 'paid' THEN invoices.amount ELSE 0 END), 0)::BIGINT AS total_paid
            FROM customers
            LEFT JOIN invoices ON customers.id = invoices.customer_id
            WHERE customers.user_id = $1
              AND (customers.name ILIKE $2 OR customers.email ILIKE $2)
            GROUP BY customers.id, customers.name, customers.email, customers.image_url
            ORDER BY customers.name ASC
            ",
        )
        .bind(tenant.as_uuid())
        .bind(like_pattern(query))
        .fetch_all(self.pool)
        .await?;

        Ok(customers)
    }

    /// Count the tenant's customers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, tenant: TenantId) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM customers
            WHERE user_id = $1
            ",
        )
        .bind(tenant.as_uuid())
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
