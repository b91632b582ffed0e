//! Domain models for the dashboard.
//!
//! Row types decoded straight from tenant-scoped queries, plus the
//! session-stored identity. Queries only ever select rows belonging to the
//! resolved tenant, so none of these carry the owning tenant id.

pub mod customer;
pub mod invoice;
pub mod session;
pub mod tenant;

pub use customer::{Customer, CustomerName, CustomerWithTotals};
pub use invoice::{Invoice, InvoiceWithCustomer, LatestInvoice, StatusTotals};
pub use session::{CurrentUser, session_keys};
pub use tenant::{NewTenant, Tenant};
