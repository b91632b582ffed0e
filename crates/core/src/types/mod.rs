//! Core types for Ledgerboard.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::Cents;
pub use status::{InvoiceStatus, InvoiceStatusError};
