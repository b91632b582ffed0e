//! Integration tests for Ledgerboard.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL, migrate, and launch the dashboard
//! cargo run -p ledgerboard-cli -- migrate
//! cargo run -p ledgerboard-dashboard
//!
//! # Run integration tests (ignored by default)
//! cargo test -p ledgerboard-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `dashboard_auth` - Signup, login, and logout flows
//! - `dashboard_invoices` - Invoice mutations, listing, and tenant scoping
//! - `dashboard_customers` - Customer mutations and listing totals
//!
//! Every test signs up a throwaway tenant, so runs are independent and safe
//! against a shared development database.
