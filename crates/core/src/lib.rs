//! Ledgerboard Core - Shared types library.
//!
//! This crate provides common types used across all Ledgerboard components:
//! - `dashboard` - Server-rendered billing dashboard
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. Database encode/decode support for the newtypes lives behind the
//! `postgres` feature so non-database consumers stay lightweight.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
