//! Tenant account storage.

use ledgerboard_core::Email;
use sqlx::PgPool;
use sqlx::prelude::FromRow;

use crate::db::RepositoryError;
use crate::models::{NewTenant, Tenant};

/// Row backing credential verification; never leaves this module.
#[derive(FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    tenant: Tenant,
    password: String,
}

/// Repository for tenant account operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new repository backed by the given pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a tenant account by email.
    ///
    /// This is the tenant resolution step: every authenticated request maps
    /// its session email back to a `users` row before touching tenant data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_email(&self, email: &Email) -> Result<Option<Tenant>, RepositoryError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r"
            SELECT id, name, email, created_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(tenant)
    }

    /// Fetch a tenant together with their stored password hash.
    ///
    /// Only the login flow needs the hash; everything else goes through
    /// [`find_by_email`](Self::find_by_email).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(Tenant, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r"
            SELECT id, name, email, created_at, password
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| (r.tenant, r.password)))
    }

    /// Insert a new tenant account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered,
    /// `RepositoryError::Database` for other failures.
    pub async fn create(&self, new_tenant: &NewTenant) -> Result<Tenant, RepositoryError> {
        sqlx::query_as::<_, Tenant>(
            r"
            INSERT INTO users (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, created_at
            ",
        )
        .bind(&new_tenant.name)
        .bind(new_tenant.email.as_str())
        .bind(&new_tenant.password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(format!(
                    "account with email {} already exists",
                    new_tenant.email
                ));
            }
            RepositoryError::Database(e)
        })
    }
}
