//! In-memory listing cache with route-level invalidation.
//!
//! Caches the two expensive listing queries (filtered invoices, customers
//! with totals) using `moka` (5-minute TTL). Mutations call
//! [`ListingCache::invalidate`] with the listing they made stale instead of
//! deleting individual keys; the next read repopulates. Card data and single
//! records are cheap enough to query directly and are never cached.

use std::sync::Arc;
use std::time::Duration;

use ledgerboard_core::TenantId;
use moka::future::Cache;

use crate::models::{CustomerWithTotals, InvoiceWithCustomer};

/// Listing pages a mutation can mark stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingRoute {
    Invoices,
    Customers,
}

/// Cache key for one page of the invoice listing.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct InvoiceListingKey {
    pub tenant: TenantId,
    pub query: String,
    pub page: i64,
}

/// Cache key for a filtered customer listing.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct CustomerListingKey {
    pub tenant: TenantId,
    pub query: String,
}

/// One cached invoice page together with the page count for its search term.
#[derive(Debug, Clone)]
pub struct InvoicePage {
    pub rows: Arc<Vec<InvoiceWithCustomer>>,
    pub total_pages: i64,
}

/// Read-through cache for the listing pages.
///
/// Keys embed the tenant id, so one tenant's entries can never serve
/// another's request. Invalidation is route-wide rather than per-key because
/// a single write can change any page of the listing.
#[derive(Clone)]
pub struct ListingCache {
    invoices: Cache<InvoiceListingKey, InvoicePage>,
    customers: Cache<CustomerListingKey, Arc<Vec<CustomerWithTotals>>>,
}

impl ListingCache {
    /// Create a new cache.
    #[must_use]
    pub fn new() -> Self {
        let invoices = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();
        let customers = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            invoices,
            customers,
        }
    }

    /// Look up a cached invoice page.
    pub async fn get_invoices(&self, key: &InvoiceListingKey) -> Option<InvoicePage> {
        self.invoices.get(key).await
    }

    /// Cache an invoice page.
    pub async fn insert_invoices(&self, key: InvoiceListingKey, page: InvoicePage) {
        self.invoices.insert(key, page).await;
    }

    /// Look up a cached customer listing.
    pub async fn get_customers(
        &self,
        key: &CustomerListingKey,
    ) -> Option<Arc<Vec<CustomerWithTotals>>> {
        self.customers.get(key).await
    }

    /// Cache a customer listing.
    pub async fn insert_customers(
        &self,
        key: CustomerListingKey,
        customers: Arc<Vec<CustomerWithTotals>>,
    ) {
        self.customers.insert(key, customers).await;
    }

    /// Drop every cached page for a listing.
    pub async fn invalidate(&self, route: ListingRoute) {
        match route {
            ListingRoute::Invoices => {
                self.invoices.invalidate_all();
                self.invoices.run_pending_tasks().await;
            }
            ListingRoute::Customers => {
                self.customers.invalidate_all();
                self.customers.run_pending_tasks().await;
            }
        }
    }
}

impl Default for ListingCache {
    fn default() -> Self {
        Self::new()
    }
}
