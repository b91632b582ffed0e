//! Customer route handlers.
//!
//! The searchable listing with invoice totals, the create/edit forms, and
//! the delete action. The same outcome-driven shape as the invoice routes,
//! minus pagination.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use ledgerboard_core::CustomerId;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::forms::{CustomerForm, FieldErrors};
use crate::middleware::RequireAuth;
use crate::models::{Customer, CustomerWithTotals};
use crate::services::MutationOutcome;
use crate::services::customers::CustomerService;
use crate::state::AppState;

// =============================================================================
// Query Types
// =============================================================================

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub query: Option<String>,
    pub error: Option<String>,
}

// =============================================================================
// View Types
// =============================================================================

/// Customer listing row with formatted invoice totals.
#[derive(Debug, Clone)]
pub struct CustomerRowView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    pub total_pending: String,
    pub total_paid: String,
}

impl From<&CustomerWithTotals> for CustomerRowView {
    fn from(row: &CustomerWithTotals) -> Self {
        Self {
            id: row.id.to_string(),
            name: row.name.clone(),
            email: row.email.to_string(),
            image_url: row.image_url.clone(),
            total_invoices: row.total_invoices,
            total_pending: row.total_pending.to_string(),
            total_paid: row.total_paid.to_string(),
        }
    }
}

/// Form field values carried back into a re-rendered customer form.
#[derive(Debug, Clone, Default)]
pub struct CustomerFormView {
    pub name: String,
    pub email: String,
}

impl From<&CustomerForm> for CustomerFormView {
    fn from(form: &CustomerForm) -> Self {
        Self {
            name: form.name.clone().unwrap_or_default(),
            email: form.email.clone().unwrap_or_default(),
        }
    }
}

impl From<&Customer> for CustomerFormView {
    fn from(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            email: customer.email.to_string(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Customer listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "customers/index.html")]
pub struct CustomersIndexTemplate {
    pub user_name: String,
    pub active: &'static str,
    pub rows: Vec<CustomerRowView>,
    pub query: String,
    pub error: Option<String>,
}

/// New customer form template.
#[derive(Template, WebTemplate)]
#[template(path = "customers/create.html")]
pub struct CustomerCreateTemplate {
    pub user_name: String,
    pub active: &'static str,
    pub form: CustomerFormView,
    pub errors: FieldErrors,
    pub message: Option<String>,
}

/// Edit customer form template.
#[derive(Template, WebTemplate)]
#[template(path = "customers/edit.html")]
pub struct CustomerEditTemplate {
    pub user_name: String,
    pub active: &'static str,
    pub id: String,
    pub form: CustomerFormView,
    pub errors: FieldErrors,
    pub message: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Customer listing page handler.
#[instrument(skip(user, state))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ListingQuery>,
) -> Result<CustomersIndexTemplate> {
    let query = params.query.unwrap_or_default();

    let service = CustomerService::new(state.pool(), state.cache());
    let customers = service.listing(Some(&user), &query).await?;

    Ok(CustomersIndexTemplate {
        user_name: user.name.clone(),
        active: "customers",
        rows: customers.iter().map(CustomerRowView::from).collect(),
        query,
        error: params.error,
    })
}

/// New customer form page handler.
pub async fn create_page(RequireAuth(user): RequireAuth) -> CustomerCreateTemplate {
    CustomerCreateTemplate {
        user_name: user.name,
        active: "customers",
        form: CustomerFormView::default(),
        errors: FieldErrors::default(),
        message: None,
    }
}

/// Create customer form submission handler.
#[instrument(skip(user, state, form))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Form(form): Form<CustomerForm>,
) -> Response {
    let service = CustomerService::new(state.pool(), state.cache());

    match service.create(Some(&user), &form).await {
        MutationOutcome::Success { redirect_to } => Redirect::to(redirect_to).into_response(),
        MutationOutcome::Invalid { errors, message } => CustomerCreateTemplate {
            user_name: user.name,
            active: "customers",
            form: CustomerFormView::from(&form),
            errors,
            message: Some(message),
        }
        .into_response(),
        MutationOutcome::Failed { message } => CustomerCreateTemplate {
            user_name: user.name,
            active: "customers",
            form: CustomerFormView::from(&form),
            errors: FieldErrors::default(),
            message: Some(message),
        }
        .into_response(),
    }
}

/// Edit customer form page handler.
pub async fn edit_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<CustomerEditTemplate> {
    let service = CustomerService::new(state.pool(), state.cache());

    let Some(customer) = service.find(Some(&user), id).await? else {
        return Err(AppError::NotFound(format!("customer {id}")));
    };

    Ok(CustomerEditTemplate {
        user_name: user.name.clone(),
        active: "customers",
        id: id.to_string(),
        form: CustomerFormView::from(&customer),
        errors: FieldErrors::default(),
        message: None,
    })
}

/// Update customer form submission handler.
#[instrument(skip(user, state, form), fields(id = %id))]
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
    Form(form): Form<CustomerForm>,
) -> Response {
    let service = CustomerService::new(state.pool(), state.cache());

    match service.update(Some(&user), id, &form).await {
        MutationOutcome::Success { redirect_to } => Redirect::to(redirect_to).into_response(),
        MutationOutcome::Invalid { errors, message } => CustomerEditTemplate {
            user_name: user.name,
            active: "customers",
            id: id.to_string(),
            form: CustomerFormView::from(&form),
            errors,
            message: Some(message),
        }
        .into_response(),
        MutationOutcome::Failed { message } => CustomerEditTemplate {
            user_name: user.name,
            active: "customers",
            id: id.to_string(),
            form: CustomerFormView::from(&form),
            errors: FieldErrors::default(),
            message: Some(message),
        }
        .into_response(),
    }
}

/// Delete customer handler. Always navigates back to the listing, carrying a
/// message in the query string on failure.
#[instrument(skip(user, state), fields(id = %id))]
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Redirect {
    let service = CustomerService::new(state.pool(), state.cache());

    match service.delete(Some(&user), id).await {
        MutationOutcome::Success { redirect_to } => Redirect::to(redirect_to),
        MutationOutcome::Invalid { message, .. } | MutationOutcome::Failed { message } => {
            Redirect::to(&format!(
                "/dashboard/customers?error={}",
                urlencoding::encode(&message)
            ))
        }
    }
}
