//! Database operations for the dashboard `PostgreSQL` instance.
//!
//! ## Tables
//!
//! - `users` - Tenant accounts (signup/login, tenant resolution)
//! - `customers` - Customer records, owned by a tenant via `user_id`
//! - `invoices` - Invoice records, owned by a tenant via `user_id`
//! - `tower_sessions.session` - Session storage (managed by the session store)
//!
//! Every customer/invoice statement carries a `user_id` predicate; the tenant
//! check and the mutation are one atomic statement, so a row belonging to
//! another tenant yields zero affected rows rather than an error.
//!
//! All queries use sqlx's runtime interface rather than the compile-time
//! macros, so builds do not require a database or an offline query cache.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/dashboard/migrations/` and run via:
//! ```bash
//! cargo run -p ledgerboard-cli -- migrate
//! ```

pub mod customers;
pub mod invoices;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use customers::CustomerRepository;
pub use invoices::InvoiceRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Build an `ILIKE` pattern matching the search term anywhere in the value.
///
/// The term is passed as a bind parameter, never interpolated into SQL.
pub(crate) fn like_pattern(query: &str) -> String {
    format!("%{query}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_wraps_term() {
        assert_eq!(like_pattern("lee"), "%lee%");
        assert_eq!(like_pattern(""), "%%");
    }
}
