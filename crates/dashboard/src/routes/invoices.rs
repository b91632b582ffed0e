//! Invoice route handlers.
//!
//! The listing, the create/edit forms, and the delete action. Form POSTs
//! hand the raw submission to the invoice service and render whatever
//! outcome comes back; only a success navigates.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use ledgerboard_core::InvoiceId;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::forms::{FieldErrors, InvoiceForm};
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, CustomerName, Invoice, InvoiceWithCustomer};
use crate::services::MutationOutcome;
use crate::services::invoices::InvoiceService;
use crate::state::AppState;

// =============================================================================
// Query Types
// =============================================================================

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub query: Option<String>,
    pub page: Option<i64>,
    pub error: Option<String>,
}

// =============================================================================
// View Types
// =============================================================================

/// Invoice listing row, formatted for display.
#[derive(Debug, Clone)]
pub struct InvoiceRowView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub amount: String,
    pub date: String,
    pub status: String,
    pub status_label: String,
}

impl From<&InvoiceWithCustomer> for InvoiceRowView {
    fn from(row: &InvoiceWithCustomer) -> Self {
        Self {
            id: row.id.to_string(),
            name: row.name.clone(),
            email: row.email.to_string(),
            image_url: row.image_url.clone(),
            amount: row.amount.to_string(),
            date: row.date.format("%b %-d, %Y").to_string(),
            status: row.status.as_str().to_owned(),
            status_label: row.status.label().to_owned(),
        }
    }
}

/// Customer selector entry.
#[derive(Debug, Clone)]
pub struct CustomerOptionView {
    pub id: String,
    pub name: String,
}

impl From<&CustomerName> for CustomerOptionView {
    fn from(customer: &CustomerName) -> Self {
        Self {
            id: customer.id.to_string(),
            name: customer.name.clone(),
        }
    }
}

/// Form field values carried back into a re-rendered invoice form.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFormView {
    pub customer_id: String,
    pub amount: String,
    pub status: String,
}

impl From<&InvoiceForm> for InvoiceFormView {
    fn from(form: &InvoiceForm) -> Self {
        Self {
            customer_id: form.customer_id.clone().unwrap_or_default(),
            amount: form.amount.clone().unwrap_or_default(),
            status: form.status.clone().unwrap_or_default(),
        }
    }
}

impl From<&Invoice> for InvoiceFormView {
    fn from(invoice: &Invoice) -> Self {
        Self {
            customer_id: invoice.customer_id.to_string(),
            amount: invoice.amount.dollars().to_string(),
            status: invoice.status.as_str().to_owned(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Invoice listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "invoices/index.html")]
pub struct InvoicesIndexTemplate {
    pub user_name: String,
    pub active: &'static str,
    pub rows: Vec<InvoiceRowView>,
    pub query: String,
    pub page: i64,
    pub total_pages: i64,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub error: Option<String>,
}

/// New invoice form template.
#[derive(Template, WebTemplate)]
#[template(path = "invoices/create.html")]
pub struct InvoiceCreateTemplate {
    pub user_name: String,
    pub active: &'static str,
    pub customers: Vec<CustomerOptionView>,
    pub form: InvoiceFormView,
    pub errors: FieldErrors,
    pub message: Option<String>,
}

/// Edit invoice form template.
#[derive(Template, WebTemplate)]
#[template(path = "invoices/edit.html")]
pub struct InvoiceEditTemplate {
    pub user_name: String,
    pub active: &'static str,
    pub id: String,
    pub customers: Vec<CustomerOptionView>,
    pub form: InvoiceFormView,
    pub errors: FieldErrors,
    pub message: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Invoice listing page handler.
#[instrument(skip(user, state))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ListingQuery>,
) -> Result<InvoicesIndexTemplate> {
    let query = params.query.unwrap_or_default();
    let page = params.page.unwrap_or(1).max(1);

    let service = InvoiceService::new(state.pool(), state.cache());
    let listing = service.listing(Some(&user), &query, page).await?;

    let total_pages = listing.total_pages.max(1);
    let prev_href = (page > 1).then(|| listing_href(&query, page - 1));
    let next_href = (page < total_pages).then(|| listing_href(&query, page + 1));

    Ok(InvoicesIndexTemplate {
        user_name: user.name.clone(),
        active: "invoices",
        rows: listing.rows.iter().map(InvoiceRowView::from).collect(),
        query,
        page,
        total_pages,
        prev_href,
        next_href,
        error: params.error,
    })
}

/// New invoice form page handler.
pub async fn create_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<InvoiceCreateTemplate> {
    let service = InvoiceService::new(state.pool(), state.cache());
    let customers = service.customer_names(Some(&user)).await?;

    Ok(InvoiceCreateTemplate {
        user_name: user.name.clone(),
        active: "invoices",
        customers: customers.iter().map(CustomerOptionView::from).collect(),
        form: InvoiceFormView::default(),
        errors: FieldErrors::default(),
        message: None,
    })
}

/// Create invoice form submission handler.
#[instrument(skip(user, state, form))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Form(form): Form<InvoiceForm>,
) -> Result<Response> {
    let service = InvoiceService::new(state.pool(), state.cache());

    match service.create(Some(&user), &form).await {
        MutationOutcome::Success { redirect_to } => Ok(Redirect::to(redirect_to).into_response()),
        MutationOutcome::Invalid { errors, message } => {
            render_create_form(&service, &user, &form, errors, message).await
        }
        MutationOutcome::Failed { message } => {
            render_create_form(&service, &user, &form, FieldErrors::default(), message).await
        }
    }
}

/// Edit invoice form page handler.
pub async fn edit_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<InvoiceId>,
) -> Result<InvoiceEditTemplate> {
    let service = InvoiceService::new(state.pool(), state.cache());

    let Some(invoice) = service.find(Some(&user), id).await? else {
        return Err(AppError::NotFound(format!("invoice {id}")));
    };
    let customers = service.customer_names(Some(&user)).await?;

    Ok(InvoiceEditTemplate {
        user_name: user.name.clone(),
        active: "invoices",
        id: id.to_string(),
        customers: customers.iter().map(CustomerOptionView::from).collect(),
        form: InvoiceFormView::from(&invoice),
        errors: FieldErrors::default(),
        message: None,
    })
}

/// Update invoice form submission handler.
#[instrument(skip(user, state, form), fields(id = %id))]
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<InvoiceId>,
    Form(form): Form<InvoiceForm>,
) -> Result<Response> {
    let service = InvoiceService::new(state.pool(), state.cache());

    match service.update(Some(&user), id, &form).await {
        MutationOutcome::Success { redirect_to } => Ok(Redirect::to(redirect_to).into_response()),
        MutationOutcome::Invalid { errors, message } => {
            render_edit_form(&service, &user, id, &form, errors, message).await
        }
        MutationOutcome::Failed { message } => {
            render_edit_form(&service, &user, id, &form, FieldErrors::default(), message).await
        }
    }
}

/// Delete invoice handler. Always navigates back to the listing, carrying a
/// message in the query string on failure.
#[instrument(skip(user, state), fields(id = %id))]
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<InvoiceId>,
) -> Redirect {
    let service = InvoiceService::new(state.pool(), state.cache());

    match service.delete(Some(&user), id).await {
        MutationOutcome::Success { redirect_to } => Redirect::to(redirect_to),
        MutationOutcome::Invalid { message, .. } | MutationOutcome::Failed { message } => {
            Redirect::to(&format!(
                "/dashboard/invoices?error={}",
                urlencoding::encode(&message)
            ))
        }
    }
}

/// Build a listing link that preserves the active search query.
fn listing_href(query: &str, page: i64) -> String {
    if query.is_empty() {
        format!("/dashboard/invoices?page={page}")
    } else {
        format!(
            "/dashboard/invoices?query={}&page={page}",
            urlencoding::encode(query)
        )
    }
}

/// Re-render the create form with the submitted values and outcome.
async fn render_create_form(
    service: &InvoiceService<'_>,
    user: &CurrentUser,
    form: &InvoiceForm,
    errors: FieldErrors,
    message: String,
) -> Result<Response> {
    let customers = service.customer_names(Some(user)).await?;

    Ok(InvoiceCreateTemplate {
        user_name: user.name.clone(),
        active: "invoices",
        customers: customers.iter().map(CustomerOptionView::from).collect(),
        form: InvoiceFormView::from(form),
        errors,
        message: Some(message),
    }
    .into_response())
}

/// Re-render the edit form with the submitted values and outcome.
async fn render_edit_form(
    service: &InvoiceService<'_>,
    user: &CurrentUser,
    id: InvoiceId,
    form: &InvoiceForm,
    errors: FieldErrors,
    message: String,
) -> Result<Response> {
    let customers = service.customer_names(Some(user)).await?;

    Ok(InvoiceEditTemplate {
        user_name: user.name.clone(),
        active: "invoices",
        id: id.to_string(),
        customers: customers.iter().map(CustomerOptionView::from).collect(),
        form: InvoiceFormView::from(form),
        errors,
        message: Some(message),
    }
    .into_response())
}
