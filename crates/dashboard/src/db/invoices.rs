//! Invoice storage, always scoped to a single tenant.

use ledgerboard_core::{Cents, CustomerId, InvoiceId, InvoiceStatus, TenantId};
use sqlx::PgPool;

use crate::db::{RepositoryError, like_pattern};
use crate::models::{Invoice, InvoiceWithCustomer, LatestInvoice, StatusTotals};

/// Invoices shown per listing page.
pub const PAGE_SIZE: i64 = 6;

/// Repository for invoice operations.
///
/// Mutations fold the tenant check into the statement itself: an id owned by
/// another tenant affects zero rows instead of failing.
pub struct InvoiceRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InvoiceRepository<'a> {
    /// Create a new repository backed by the given pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an invoice dated today, provided the referenced customer belongs
    /// to the tenant.
    ///
    /// Returns the number of affected rows; zero means the customer id did not
    /// resolve under this tenant and nothing was written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(
        &self,
        tenant: TenantId,
        customer: CustomerId,
        amount: Cents,
        status: InvoiceStatus,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO invoices (customer_id, amount, status, date, user_id)
            SELECT $1, $2, $3, CURRENT_DATE, $4
            WHERE EXISTS (
                SELECT 1 FROM customers
                WHERE id = $1 AND user_id = $4
            )
            ",
        )
        .bind(customer.as_uuid())
        .bind(amount.as_i64())
        .bind(status.as_str())
        .bind(tenant.as_uuid())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Update an invoice's customer, amount, and status, keeping its date.
    ///
    /// The statement requires both the invoice and the new customer to belong
    /// to the tenant. Returns the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        tenant: TenantId,
        id: InvoiceId,
        customer: CustomerId,
        amount: Cents,
        status: InvoiceStatus,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE invoices
            SET customer_id = $1, amount = $2, status = $3
            WHERE id = $4 AND user_id = $5
              AND EXISTS (
                  SELECT 1 FROM customers
                  WHERE id = $1 AND user_id = $5
              )
            ",
        )
        .bind(customer.as_uuid())
        .bind(amount.as_i64())
        .bind(status.as_str())
        .bind(id.as_uuid())
        .bind(tenant.as_uuid())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete an invoice. Returns the number of affected rows; zero when the
    /// row is absent or owned by another tenant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, tenant: TenantId, id: InvoiceId) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM invoices
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id.as_uuid())
        .bind(tenant.as_uuid())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Fetch a single invoice by id for the edit form, or `None` when the id
    /// does not resolve under this tenant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(
        &self,
        tenant: TenantId,
        id: InvoiceId,
    ) -> Result<Option<Invoice>, RepositoryError> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r"
            SELECT id, customer_id, amount, status
            FROM invoices
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id.as_uuid())
        .bind(tenant.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        Ok(invoice)
    }

    /// List one page of the tenant's invoices joined with customer details,
    /// newest first.
    ///
    /// The search term matches case-insensitively against customer name and
    /// email plus the text renderings of amount, date, and status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_filtered(
        &self,
        tenant: TenantId,
        query: &str,
        page: i64,
    ) -> Result<Vec<InvoiceWithCustomer>, RepositoryError> {
        let offset = (page - 1) * PAGE_SIZE;
        let invoices = sqlx::query_as::<_, InvoiceWithCustomer>(
            r"
            SELECT invoices.id, invoices.amount, invoices.date, invoices.status,
                   customers.name, customers.email, customers.image_url
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            WHERE invoices.user_id = $1
              AND (customers.name ILIKE $2
                   OR customers.email ILIKE $2
                   OR invoices.amount::text ILIKE $2
                   OR invoices.date::text ILIKE $2
                   OR invoices.status ILIKE $2)
            ORDER BY invoices.date DESC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(tenant.as_uuid())
        .bind(like_pattern(query))
        .bind(PAGE_SIZE)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(invoices)
    }

    /// Count the invoices matching a search term, using the same predicate as
    /// [`list_filtered`](Self::list_filtered).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_filtered(
        &self,
        tenant: TenantId,
        query: &str,
    ) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            WHERE invoices.user_id = $1
              AND (customers.name ILIKE $2
                   OR customers.email ILIKE $2
                   OR invoices.amount::text ILIKE $2
                   OR invoices.date::text ILIKE $2
                   OR invoices.status ILIKE $2)
            ",
        )
        .bind(tenant.as_uuid())
        .bind(like_pattern(query))
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Fetch the five most recent invoices with customer details.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest(&self, tenant: TenantId) -> Result<Vec<LatestInvoice>, RepositoryError> {
        let invoices = sqlx::query_as::<_, LatestInvoice>(
            r"
            SELECT invoices.id, invoices.amount,
                   customers.name, customers.image_url, customers.email
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            WHERE invoices.user_id = $1
            ORDER BY invoices.date DESC
            LIMIT 5
            ",
        )
        .bind(tenant.as_uuid())
        .fetch_all(self.pool)
        .await?;

        Ok(invoices)
    }

    /// Count the tenant's invoices.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, tenant: TenantId) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM invoices
            WHERE user_id = $1
            ",
        )
        .bind(tenant.as_uuid())
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Sum invoice amounts by status in a single pass.
    ///
    /// Sums are cast to `BIGINT` because `SUM` over a `BIGINT` column widens
    /// to `NUMERIC`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn status_totals(&self, tenant: TenantId) -> Result<StatusTotals, RepositoryError> {
        let totals = sqlx::query_as::<_, StatusTotals>(
            r"
            SELECT COALESCE(SUM(CASE WHEN status = 'paid' THEN amount ELSE 0 END), 0)::BIGINT AS paid,
                   COALESCE(SUM(CASE WHEN status = 'pending' THEN amount ELSE 0 END), 0)::BIGINT AS pending
            FROM invoices
            WHERE user_id = $1
            ",
        )
        .bind(tenant.as_uuid())
        .fetch_one(self.pool)
        .await?;

        Ok(totals)
    }
}
