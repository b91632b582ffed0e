//! Integration tests for customer mutations, aggregate totals, and tenant scoping.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied (lb-cli migrate)
//! - The dashboard server running (cargo run -p ledgerboard-dashboard)
//!
//! Run with: cargo test -p ledgerboard-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use uuid::Uuid;

/// Base URL for the dashboard (configurable via environment).
fn base_url() -> String {
    std::env::var("DASHBOARD_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Client that keeps cookies and leaves redirects visible to assertions.
fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Sign up a fresh tenant and leave its session cookie on the client.
async fn signup(client: &Client) {
    let email = format!("tenant-{}@integration.test", Uuid::new_v4());
    let resp = client
        .post(format!("{}/auth/signup", base_url()))
        .form(&[
            ("name", "Integration Tenant"),
            ("email", email.as_str()),
            ("password", "integration-pw-1"),
        ])
        .send()
        .await
        .expect("Failed to sign up");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

/// Create a customer and return its id along with the generated email.
async fn create_customer(client: &Client, name: &str) -> (String, String) {
    let base = base_url();
    let email = format!("customer-{}@integration.test", Uuid::new_v4());
    let resp = client
        .post(format!("{base}/dashboard/customers/create"))
        .form(&[("name", name), ("email", email.as_str())])
        .send()
        .await
        .expect("Failed to create customer");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let body = client
        .get(format!("{base}/dashboard/customers?query={email}"))
        .send()
        .await
        .expect("Failed to list customers")
        .text()
        .await
        .expect("Failed to read listing");

    let id = extract_id(&body, "/dashboard/customers/").expect("customer id not found in listing");
    (id, email)
}

/// Create an invoice for the customer.
async fn create_invoice(client: &Client, customer_id: &str, amount: &str, status: &str) {
    let resp = client
        .post(format!("{}/dashboard/invoices/create", base_url()))
        .form(&[
            ("customer_id", customer_id),
            ("amount", amount),
            ("status", status),
        ])
        .send()
        .await
        .expect("Failed to create invoice");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

/// Pull the first uuid that follows `prefix` in the page body.
fn extract_id(body: &str, prefix: &str) -> Option<String> {
    let mut search = body;
    while let Some(pos) = search.find(prefix) {
        let tail = search.get(pos + prefix.len()..)?;
        if let Some(candidate) = tail.get(..36) {
            if Uuid::parse_str(candidate).is_ok() {
                return Some(candidate.to_owned());
            }
        }
        search = tail;
    }
    None
}

/// The Location header of a redirect response.
fn location(resp: &reqwest::Response) -> String {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

// ============================================================================
// Create & Totals Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_customer_create_appears_with_zero_totals() {
    let client = client();
    signup(&client).await;

    let (_, email) = create_customer(&client, "Amy Burns").await;

    // The listing is cached, so a stale page here would mean invalidation broke
    let body = client
        .get(format!("{}/dashboard/customers", base_url()))
        .send()
        .await
        .expect("Failed to list customers")
        .text()
        .await
        .expect("Failed to read listing");
    assert!(body.contains("Amy Burns"));
    assert!(body.contains(&email));
    assert!(body.contains("$0.00"));
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_customer_empty_form_reports_every_field() {
    let client = client();
    signup(&client).await;

    let resp = client
        .post(format!("{}/dashboard/customers/create", base_url()))
        .form(&[("name", ""), ("email", "")])
        .send()
        .await
        .expect("Failed to post customer form");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("Failed to read form page");
    assert!(body.contains("Name is required."));
    assert!(body.contains("Email is required."));
    assert!(body.contains("Please enter a valid email address."));
    assert!(body.contains("Missing fields. Failed to create customer."));
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_customer_totals_track_invoices() {
    let client = client();
    signup(&client).await;
    let (customer_id, _) = create_customer(&client, "Balazs Orban").await;

    create_invoice(&client, &customer_id, "100.00", "pending").await;
    create_invoice(&client, &customer_id, "25.50", "paid").await;

    let body = client
        .get(format!("{}/dashboard/customers", base_url()))
        .send()
        .await
        .expect("Failed to list customers")
        .text()
        .await
        .expect("Failed to read listing");
    assert!(body.contains("Balazs Orban"));
    assert!(body.contains("$100.00"));
    assert!(body.contains("$25.50"));
}

// ============================================================================
// Update Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_customer_update_changes_listing() {
    let client = client();
    signup(&client).await;
    let (customer_id, _) = create_customer(&client, "Lee Robinson").await;

    let base = base_url();
    let new_email = format!("renamed-{}@integration.test", Uuid::new_v4());
    let resp = client
        .post(format!("{base}/dashboard/customers/{customer_id}/edit"))
        .form(&[("name", "Lee R. Robinson"), ("email", new_email.as_str())])
        .send()
        .await
        .expect("Failed to update customer");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard/customers");

    let body = client
        .get(format!("{base}/dashboard/customers"))
        .send()
        .await
        .expect("Failed to list customers")
        .text()
        .await
        .expect("Failed to read listing");
    assert!(body.contains("Lee R. Robinson"));
    assert!(body.contains(&new_email));
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_customer_update_scoped_to_tenant() {
    let owner = client();
    signup(&owner).await;
    let (customer_id, email) = create_customer(&owner, "Michael Novotny").await;

    let intruder = client();
    signup(&intruder).await;

    let base = base_url();

    // A well-formed update against another tenant's row matches nothing
    let resp = intruder
        .post(format!("{base}/dashboard/customers/{customer_id}/edit"))
        .form(&[("name", "Hijacked"), ("email", "hijacked@integration.test")])
        .send()
        .await
        .expect("Failed to post cross-tenant update");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    // The edit page itself is invisible across tenants
    let resp = intruder
        .get(format!("{base}/dashboard/customers/{customer_id}/edit"))
        .send()
        .await
        .expect("Failed to fetch cross-tenant edit page");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body = owner
        .get(format!("{base}/dashboard/customers"))
        .send()
        .await
        .expect("Failed to list customers")
        .text()
        .await
        .expect("Failed to read listing");
    assert!(body.contains("Michael Novotny"));
    assert!(body.contains(&email));
    assert!(!body.contains("Hijacked"));
}

// ============================================================================
// Delete Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_customer_delete_without_invoices_succeeds() {
    let client = client();
    signup(&client).await;
    let (customer_id, email) = create_customer(&client, "Emil Kowalski").await;

    let base = base_url();
    let resp = client
        .post(format!("{base}/dashboard/customers/{customer_id}/delete"))
        .send()
        .await
        .expect("Failed to delete customer");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard/customers");

    let body = client
        .get(format!("{base}/dashboard/customers"))
        .send()
        .await
        .expect("Failed to list customers")
        .text()
        .await
        .expect("Failed to read listing");
    assert!(!body.contains(&email));
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_customer_delete_with_invoices_blocked() {
    let client = client();
    signup(&client).await;
    let (customer_id, email) = create_customer(&client, "Delba de Oliveira").await;
    create_invoice(&client, &customer_id, "42.00", "pending").await;

    let base = base_url();
    let resp = client
        .post(format!("{base}/dashboard/customers/{customer_id}/delete"))
        .send()
        .await
        .expect("Failed to post customer delete");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let loc = location(&resp);
    assert!(loc.starts_with("/dashboard/customers?error="));
    assert!(loc.contains("Cannot%20delete"));

    // Following the redirect renders the error banner and keeps the row
    let body = client
        .get(format!("{base}{loc}"))
        .send()
        .await
        .expect("Failed to follow delete redirect")
        .text()
        .await
        .expect("Failed to read listing");
    assert!(body.contains("Cannot delete a customer that still has invoices."));
    assert!(body.contains(&email));
}
