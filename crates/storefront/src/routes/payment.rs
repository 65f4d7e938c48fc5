//! Payment view and checkout confirmation.
//!
//! Payment is manual UPI: the page shows a QR code for the cart total and
//! the buyer pastes the transaction reference from their UPI app. The
//! reference is recorded on trust; an admin verifies it before confirming.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;
use tracing::instrument;

use learnsphere_core::Email;

use crate::db::TransactionRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::current_user;
use crate::models::session::Flash;
use crate::models::transaction::NewTransaction;
use crate::state::AppState;

use super::command::ConfirmPurchaseForm;
use super::{PageContext, set_flash};

/// Order summary line for the payment page.
pub struct SummaryItemView {
    pub name: String,
    pub price: String,
}

/// Payment page template.
#[derive(Template, WebTemplate)]
#[template(path = "payment.html")]
pub struct PaymentTemplate {
    pub ctx: PageContext,
    pub items: Vec<SummaryItemView>,
    pub total: String,
    pub qr_url: String,
    /// Logged-in user's email, prefilled into the form.
    pub prefill_email: String,
    pub errors: Vec<String>,
}

/// Build the QR image URL for a UPI payment of `amount`.
///
/// The UPI URI goes through the third-party QR generator, so the whole
/// payload is percent-encoded into its `data` parameter.
fn upi_qr_url(vpa: &str, payee: &str, amount: &str) -> String {
    let upi = format!("upi://pay?pa={vpa}&pn={payee}&am={amount}&cu=INR");
    format!(
        "https://api.qrserver.com/v1/create-qr-code/?size=200x200&data={}",
        urlencoding::encode(&upi)
    )
}

/// Validate the checkout form, collecting every failure.
fn validate_confirm_form(email: &str, payment_reference: &str, cart_empty: bool) -> Vec<String> {
    let mut errors = Vec::new();

    if email.is_empty() || payment_reference.is_empty() {
        errors.push("Email and transaction ID are required.".to_string());
    }

    if Email::parse(email).is_err() {
        errors.push("Invalid email format.".to_string());
    }

    if cart_empty {
        errors.push("Your cart is empty.".to_string());
    }

    errors
}

async fn render(
    state: &AppState,
    session: &Session,
    errors: Vec<String>,
) -> Result<Response, AppError> {
    let cart = super::cart::load_cart(session).await?;

    let items = cart
        .iter()
        .map(|item| SummaryItemView {
            name: item.name.clone(),
            price: item.price.to_string(),
        })
        .collect();
    let total = cart.total().to_string();
    let qr_url = upi_qr_url(&state.config().upi.vpa, &state.config().upi.payee, &total);

    let prefill_email = current_user(session)
        .await?
        .map(|user| user.email.to_string())
        .unwrap_or_default();

    let ctx = PageContext::gather(session).await?;
    Ok(PaymentTemplate {
        ctx,
        items,
        total,
        qr_url,
        prefill_email,
        errors,
    }
    .into_response())
}

/// Display the payment page.
#[instrument(skip(state, session))]
pub async fn show(state: &AppState, session: &Session) -> Result<Response, AppError> {
    render(state, session, Vec::new()).await
}

/// Handle the checkout confirmation.
///
/// Validation failures are collected and re-rendered on the payment form.
/// Success inserts one `Pending` transaction, empties the cart, and lands
/// on the home page with a flash.
#[instrument(skip(state, session, form))]
pub async fn confirm(
    state: &AppState,
    session: &Session,
    form: ConfirmPurchaseForm,
) -> Result<Response, AppError> {
    let email = form.email.trim().to_string();
    let payment_reference = form.transaction_id.trim().to_string();

    let mut cart = super::cart::load_cart(session).await?;

    let errors = validate_confirm_form(&email, &payment_reference, cart.is_empty());
    if !errors.is_empty() {
        return render(state, session, errors).await;
    }

    let user_id = current_user(session).await?.map(|user| user.id);
    let new = NewTransaction {
        user_id,
        email,
        payment_reference,
        courses_purchased: cart.course_names(),
        total_amount: cart.total(),
    };

    let id = TransactionRepository::new(state.pool()).create(&new).await?;
    tracing::info!(transaction_id = %id, total = %new.total_amount, "pending transaction recorded");

    cart.clear();
    super::cart::store_cart(session, &cart).await?;

    set_flash(
        session,
        Flash::success("Purchase confirmed! Your PDFs will be delivered shortly."),
    )
    .await?;
    Ok(Redirect::to("/").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_qr_url_encodes_upi_payload() {
        let url = upi_qr_url("learnsphere@upi", "LearnSphere", "108");
        assert_eq!(
            url,
            "https://api.qrserver.com/v1/create-qr-code/?size=200x200&data=upi%3A%2F%2Fpay%3Fpa%3Dlearnsphere%40upi%26pn%3DLearnSphere%26am%3D108%26cu%3DINR"
        );
    }

    #[test]
    fn test_qr_amount_keeps_decimal_form() {
        let total = Decimal::new(10850, 2); // 108.50
        let url = upi_qr_url("learnsphere@upi", "LearnSphere", &total.to_string());
        assert!(url.contains("am%3D108.50"));
    }

    #[test]
    fn test_empty_fields_rejected() {
        let errors = validate_confirm_form("", "", false);
        assert!(errors.contains(&"Email and transaction ID are required.".to_string()));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let errors = validate_confirm_form("not-an-email", "TXN123", false);
        assert_eq!(errors, vec!["Invalid email format.".to_string()]);
    }

    #[test]
    fn test_empty_cart_rejected() {
        let errors = validate_confirm_form("a@b.com", "TXN123", true);
        assert_eq!(errors, vec!["Your cart is empty.".to_string()]);
    }

    #[test]
    fn test_failures_are_collected_not_short_circuited() {
        let errors = validate_confirm_form("", "", true);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(validate_confirm_form("a@b.com", "TXN123", false).is_empty());
    }
}
