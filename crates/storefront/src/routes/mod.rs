//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                - Render a view chosen by the `view` query parameter:
//!                         home (default), register, login, cart, payment, admin.
//!                         `?logout` clears the session identity first.
//! POST /                - Dispatch a command named by a sentinel form field:
//!                         register, login, update_cart, confirm_purchase,
//!                         confirm_order, add_to_cart (JSON response).
//! GET  /health          - Liveness check
//! GET  /health/ready    - Readiness check (database ping)
//! GET  /static/*        - Static assets
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod command;
pub mod home;
pub mod payment;

use std::collections::HashMap;

use axum::{
    Form, Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user};
use crate::middleware::{clear_current_user, current_user};
use crate::models::session::{CurrentUser, Flash, keys};
use crate::state::AppState;

pub use command::Command;

/// The allow-listed set of render targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Register,
    Login,
    Cart,
    Payment,
    Admin,
}

impl View {
    /// Map the `view` query parameter to a view; anything unrecognized (or
    /// absent) falls back to the home view.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("register") => Self::Register,
            Some("login") => Self::Login,
            Some("cart") => Self::Cart,
            Some("payment") => Self::Payment,
            Some("admin") => Self::Admin,
            _ => Self::Home,
        }
    }
}

/// Query parameters for the page endpoint.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub view: Option<String>,
    /// Presence alone triggers logout (`?logout`).
    pub logout: Option<String>,
}

/// Per-request context shared by every page template: the header user menu,
/// the cart badge, and the one-shot flash banner.
pub struct PageContext {
    pub current_user: Option<CurrentUser>,
    pub cart_count: usize,
    pub flash: Option<Flash>,
}

impl PageContext {
    /// Gather the context from the session, consuming any flash message.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store fails.
    pub async fn gather(session: &Session) -> Result<Self, AppError> {
        let current_user = current_user(session).await?;
        let cart = cart::load_cart(session).await?;
        let flash = take_flash(session).await?;

        Ok(Self {
            current_user,
            cart_count: cart.count(),
            flash,
        })
    }

    /// Whether the session belongs to an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current_user
            .as_ref()
            .is_some_and(CurrentUser::is_admin)
    }
}

/// Store a flash message for the next render.
///
/// # Errors
///
/// Returns `AppError::Session` if the session store fails.
pub async fn set_flash(session: &Session, flash: Flash) -> Result<(), AppError> {
    session.insert(keys::FLASH, flash).await?;
    Ok(())
}

/// Take (read and remove) the pending flash message, if any.
async fn take_flash(session: &Session) -> Result<Option<Flash>, AppError> {
    Ok(session.remove::<Flash>(keys::FLASH).await?)
}

/// Create the storefront router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(page).post(submit))
}

/// Render the requested view.
#[instrument(skip(state, session))]
async fn page(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    if query.logout.is_some() {
        clear_current_user(&session).await?;
        clear_sentry_user();
        set_flash(&session, Flash::success("You have been logged out.")).await?;
        return Ok(Redirect::to("/").into_response());
    }

    match View::from_query(query.view.as_deref()) {
        View::Home => home::show(&session).await,
        View::Register => auth::register_page(&session).await,
        View::Login => auth::login_page(&session).await,
        View::Cart => cart::show(&session).await,
        View::Payment => payment::show(&state, &session).await,
        View::Admin => admin::dashboard(&state, &session).await,
    }
}

/// Dispatch a POST command.
#[instrument(skip(state, session, form))]
async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    match Command::parse(&form) {
        Some(Command::Register(f)) => auth::register(&state, &session, f).await,
        Some(Command::Login(f)) => auth::login(&state, &session, f).await,
        Some(Command::UpdateCart(f)) => cart::update(&session, f).await,
        Some(Command::ConfirmPurchase(f)) => payment::confirm(&state, &session, f).await,
        Some(Command::ConfirmOrder(f)) => admin::confirm_order(&state, &session, f).await,
        Some(Command::AddToCart(f)) => cart::add(&session, f).await,
        // No sentinel named: nothing to do, render home
        None => Ok(Redirect::to("/").into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_allowlist() {
        assert_eq!(View::from_query(Some("register")), View::Register);
        assert_eq!(View::from_query(Some("login")), View::Login);
        assert_eq!(View::from_query(Some("cart")), View::Cart);
        assert_eq!(View::from_query(Some("payment")), View::Payment);
        assert_eq!(View::from_query(Some("admin")), View::Admin);
    }

    #[test]
    fn test_unknown_view_falls_back_to_home() {
        assert_eq!(View::from_query(None), View::Home);
        assert_eq!(View::from_query(Some("")), View::Home);
        assert_eq!(View::from_query(Some("checkout")), View::Home);
        assert_eq!(View::from_query(Some("ADMIN")), View::Home);
    }
}
