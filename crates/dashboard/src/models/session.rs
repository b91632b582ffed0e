//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use ledgerboard_core::Email;

/// Session-stored user identity.
///
/// Only the email claim and a display name are kept in the session. The
/// tenant id is deliberately not stored: every request resolves the email
/// against the users table, so a deleted account fails closed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's display name.
    pub name: String,
    /// User's email address (normalized to lowercase at login).
    pub email: Email,
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
