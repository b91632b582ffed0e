//! Business logic services for the dashboard.
//!
//! # Services
//!
//! - `auth` - Signup, login, and resolving the session claim to a tenant
//! - `customers` - Customer listing queries and validated mutations
//! - `dashboard` - Overview card aggregates and latest invoices
//! - `invoices` - Invoice listing queries and validated mutations
//!
//! Every mutation follows the same pipeline: validate the form, resolve the
//! tenant from the session claim, issue one tenant-scoped statement, then
//! invalidate the affected listing cache. The conclusion is always a
//! [`MutationOutcome`] value; validation problems and database failures are
//! data for the handler to render, never errors that abort the request.

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod invoices;

use thiserror::Error;

pub use auth::{AuthError, AuthService};

use crate::db::RepositoryError;
use crate::forms::FieldErrors;

/// Every way a validated mutation can conclude.
///
/// Navigation is the caller's job: a service reports `redirect_to` as data
/// and never touches the response.
#[derive(Debug)]
pub enum MutationOutcome {
    /// The statement ran; the caller should navigate to the listing. A write
    /// that matched zero rows because the id belongs to another tenant also
    /// lands here, deliberately indistinguishable from the row being gone.
    Success { redirect_to: &'static str },

    /// Validation rejected the form. Re-render with the per-field messages
    /// and the summary line.
    Invalid {
        errors: FieldErrors,
        message: String,
    },

    /// The tenant could not be resolved or the statement failed. The message
    /// is safe to show; the cause is already logged.
    Failed { message: String },
}

/// Errors from the read-side service operations.
///
/// Mutations never produce this; their failures are [`MutationOutcome`]
/// variants.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
