//! Overview page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::LatestInvoice;
use crate::services::dashboard::{CardData, DashboardService};
use crate::state::AppState;

/// Card values, formatted for display.
#[derive(Debug, Clone)]
pub struct CardView {
    pub collected: String,
    pub pending: String,
    pub invoice_count: i64,
    pub customer_count: i64,
}

impl From<CardData> for CardView {
    fn from(data: CardData) -> Self {
        Self {
            collected: data.total_paid.to_string(),
            pending: data.total_pending.to_string(),
            invoice_count: data.invoice_count,
            customer_count: data.customer_count,
        }
    }
}

/// Latest invoice row, formatted for display.
#[derive(Debug, Clone)]
pub struct LatestInvoiceView {
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub amount: String,
}

impl From<LatestInvoice> for LatestInvoiceView {
    fn from(invoice: LatestInvoice) -> Self {
        Self {
            name: invoice.name,
            email: invoice.email.into_inner(),
            image_url: invoice.image_url,
            amount: invoice.amount.to_string(),
        }
    }
}

/// Overview page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/overview.html")]
pub struct OverviewTemplate {
    pub user_name: String,
    pub active: &'static str,
    pub cards: CardView,
    pub latest: Vec<LatestInvoiceView>,
}

/// Overview page handler.
///
/// The card aggregates and the latest-invoice list are independent reads and
/// run concurrently.
#[instrument(skip(user, state))]
pub async fn overview(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<OverviewTemplate> {
    let service = DashboardService::new(state.pool());
    let claim = Some(&user);

    let (cards, latest) = tokio::try_join!(
        service.card_data(claim),
        service.latest_invoices(claim),
    )?;

    Ok(OverviewTemplate {
        user_name: user.name.clone(),
        active: "overview",
        cards: cards.into(),
        latest: latest.into_iter().map(Into::into).collect(),
    })
}
