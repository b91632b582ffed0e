//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication and tenant resolution.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No session, or the session carries no email claim.
    #[error("not authenticated")]
    Unauthenticated,

    /// The session email no longer resolves to a tenant account.
    #[error("user not found")]
    UserNotFound,

    /// Wrong password, or no account under that email.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Signup against an email that already has an account.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// The message shown to the end user. Internal causes collapse to a
    /// generic line; details stay in the logs.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "Not authenticated.",
            Self::UserNotFound => "User not found.",
            Self::InvalidCredentials => "Invalid credentials.",
            Self::UserAlreadyExists => "An account with this email already exists.",
            Self::PasswordHash | Self::Repository(_) => "Something went wrong.",
        }
    }
}
