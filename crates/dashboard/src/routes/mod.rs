//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Redirect to /dashboard or /auth/login
//! GET  /health                 - Health check
//! GET  /health/ready           - Readiness check (probes the database)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/signup            - Signup page
//! POST /auth/signup            - Signup action
//! POST /auth/logout            - Logout action
//!
//! # Dashboard (requires auth)
//! GET  /dashboard                         - Overview: cards + latest invoices
//! GET  /dashboard/invoices                - Filtered, paginated invoice listing
//! GET  /dashboard/invoices/create        - New invoice form
//! POST /dashboard/invoices/create        - Create invoice
//! GET  /dashboard/invoices/{id}/edit     - Edit invoice form
//! POST /dashboard/invoices/{id}/edit     - Update invoice
//! POST /dashboard/invoices/{id}/delete   - Delete invoice
//! GET  /dashboard/customers              - Customer listing with invoice totals
//! GET  /dashboard/customers/create       - New customer form
//! POST /dashboard/customers/create       - Create customer
//! GET  /dashboard/customers/{id}/edit    - Edit customer form
//! POST /dashboard/customers/{id}/edit    - Update customer
//! POST /dashboard/customers/{id}/delete  - Delete customer
//! ```

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod invoices;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", post(auth::logout))
}

/// Create the invoice routes router.
pub fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(invoices::index))
        .route(
            "/create",
            get(invoices::create_page).post(invoices::create),
        )
        .route(
            "/{id}/edit",
            get(invoices::edit_page).post(invoices::update),
        )
        .route("/{id}/delete", post(invoices::delete))
}

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::index))
        .route(
            "/create",
            get(customers::create_page).post(customers::create),
        )
        .route(
            "/{id}/edit",
            get(customers::edit_page).post(customers::update),
        )
        .route("/{id}/delete", post(customers::delete))
}

/// Root handler: send the browser wherever it belongs.
async fn root(OptionalAuth(user): OptionalAuth) -> Redirect {
    if user.is_some() {
        Redirect::to("/dashboard")
    } else {
        Redirect::to("/auth/login")
    }
}

/// Create all routes for the dashboard.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/dashboard", get(dashboard::overview))
        .nest("/dashboard/invoices", invoice_routes())
        .nest("/dashboard/customers", customer_routes())
        .nest("/auth", auth_routes())
}
