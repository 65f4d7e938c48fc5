//! Admin dashboard and order confirmation.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;
use tracing::instrument;

use learnsphere_core::TransactionId;

use crate::db::TransactionRepository;
use crate::error::AppError;
use crate::filters;
use crate::models::transaction::Transaction;
use crate::state::AppState;

use super::command::ConfirmOrderForm;
use super::PageContext;

/// One row of the transaction history table, preformatted for display.
pub struct TransactionRowView {
    pub id: String,
    /// Username, or "Guest" for anonymous purchases.
    pub username: String,
    pub email: String,
    pub payment_reference: String,
    pub courses: String,
    pub amount: String,
    pub pending: bool,
    pub date: String,
}

impl From<&Transaction> for TransactionRowView {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.to_string(),
            username: tx.username.clone().unwrap_or_else(|| "Guest".to_string()),
            email: tx.email.clone(),
            payment_reference: tx.payment_reference.clone(),
            courses: tx.courses_purchased.clone(),
            amount: tx.total_amount.to_string(),
            pending: tx.status.is_pending(),
            date: tx.purchase_timestamp.format("%d %b %Y, %H:%M").to_string(),
        }
    }
}

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub transactions: Vec<TransactionRowView>,
}

/// Access-denied page shown to non-admin sessions.
#[derive(Template, WebTemplate)]
#[template(path = "admin/access_denied.html")]
pub struct AccessDeniedTemplate {
    pub ctx: PageContext,
}

/// Display the admin dashboard, or an access-denied page for anyone else.
#[instrument(skip(state, session))]
pub async fn dashboard(state: &AppState, session: &Session) -> Result<Response, AppError> {
    let ctx = PageContext::gather(session).await?;

    if !ctx.is_admin() {
        return Ok(AccessDeniedTemplate { ctx }.into_response());
    }

    let transactions = TransactionRepository::new(state.pool())
        .list_with_usernames()
        .await?
        .iter()
        .map(TransactionRowView::from)
        .collect();

    Ok(DashboardTemplate { ctx, transactions }.into_response())
}

/// Confirm a pending transaction.
///
/// Non-admin callers are a silent no-op; either way the response returns
/// to the admin view, which re-renders as access denied for them.
#[instrument(skip(state, session, form))]
pub async fn confirm_order(
    state: &AppState,
    session: &Session,
    form: ConfirmOrderForm,
) -> Result<Response, AppError> {
    let user = crate::middleware::current_user(session).await?;

    if user.is_some_and(|u| u.is_admin())
        && let Ok(raw) = form.transaction_id.parse::<i32>()
    {
        let id = TransactionId::new(raw);
        let updated = TransactionRepository::new(state.pool()).confirm(id).await?;
        if updated {
            tracing::info!(transaction_id = %id, "transaction confirmed");
        } else {
            tracing::warn!(transaction_id = %id, "confirm targeted a missing transaction");
        }
    }

    Ok(Redirect::to("/?view=admin").into_response())
}
