//! Tenant (user account) domain types.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use ledgerboard_core::{Email, TenantId};

/// A registered tenant account.
///
/// The password hash never leaves the database layer; credential checks
/// return it separately from this type.
#[derive(Debug, Clone, FromRow)]
pub struct Tenant {
    /// Unique tenant ID.
    pub id: TenantId,
    /// Display name.
    pub name: String,
    /// Login email, unique across tenants.
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Parameters for creating a tenant at signup.
#[derive(Debug)]
pub struct NewTenant {
    /// Display name.
    pub name: String,
    /// Login email (already normalized).
    pub email: Email,
    /// PHC-format Argon2 hash of the password.
    pub password_hash: String,
}
