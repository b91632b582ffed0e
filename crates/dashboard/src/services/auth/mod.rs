//! Authentication service.
//!
//! Handles signup, password login, and the tenant resolution step every
//! other service runs before touching tenant data.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use ledgerboard_core::{Email, TenantId};
use sqlx::PgPool;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::{CurrentUser, NewTenant, Tenant};

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Resolve the session claim to the tenant id that scopes every query
    /// and mutation.
    ///
    /// The claim is re-checked against the `users` table on every call, so a
    /// deleted account stops resolving immediately even while its session
    /// cookie is still alive.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthenticated` when no claim is present and
    /// `AuthError::UserNotFound` when the email no longer matches an account.
    pub async fn resolve_tenant(
        &self,
        claim: Option<&CurrentUser>,
    ) -> Result<TenantId, AuthError> {
        let claim = claim.ok_or(AuthError::Unauthenticated)?;

        let tenant = self
            .users
            .find_by_email(&claim.email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(tenant.id)
    }

    /// Register a new tenant account from a validated signup payload.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the email is taken.
    pub async fn signup(
        &self,
        name: &str,
        email: &Email,
        password: &str,
    ) -> Result<Tenant, AuthError> {
        let password_hash = hash_password(password)?;

        let tenant = self
            .users
            .create(&NewTenant {
                name: name.to_owned(),
                email: email.clone(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(tenant)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the email is unknown or
    /// the password does not match; the two cases are not distinguished.
    pub async fn login(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Tenant, AuthError> {
        let (tenant, password_hash) = self
            .users
            .credentials_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(tenant)
    }
}

/// Hash a password using Argon2id.
///
/// Shared with the seed tooling so demo accounts get the same hash format as
/// signups.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_round_trips() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
    }

    #[test]
    fn test_wrong_password_is_invalid_credentials() {
        let hash = hash_password("correct horse battery").unwrap();
        let err = verify_password("wrong password", &hash).unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn test_garbage_hash_is_invalid_credentials() {
        let err = verify_password("anything", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("same password").unwrap();
        let second = hash_password("same password").unwrap();
        assert_ne!(first, second);
    }
}
