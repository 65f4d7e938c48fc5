//! Cart handlers.
//!
//! The cart lives whole in the session. Add-to-cart is the one JSON
//! endpoint in the system, called by the browser script; removal is a
//! regular form POST that redirects back to the cart view.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use learnsphere_core::CourseId;

use crate::error::AppError;
use crate::filters;
use crate::models::cart::{Cart, CartItem};
use crate::models::session::keys;

use super::PageContext;
use super::command::{AddToCartForm, UpdateCartForm};

/// Cart line display data.
pub struct CartItemView {
    pub id: CourseId,
    pub name: String,
    pub price: String,
    pub image: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub ctx: PageContext,
    pub items: Vec<CartItemView>,
    pub total: String,
}

/// JSON body returned by the add-to-cart endpoint.
#[derive(Debug, Serialize)]
pub struct AddToCartResponse {
    pub success: bool,
    pub cart_count: usize,
}

/// Load the session cart; an absent key is an empty cart.
///
/// # Errors
///
/// Returns `AppError::Session` if the session store fails.
pub(crate) async fn load_cart(session: &Session) -> Result<Cart, AppError> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Write the cart back to the session.
///
/// # Errors
///
/// Returns `AppError::Session` if the session store fails.
pub(crate) async fn store_cart(session: &Session, cart: &Cart) -> Result<(), AppError> {
    session.insert(keys::CART, cart).await?;
    Ok(())
}

/// Display the cart page.
#[instrument(skip(session))]
pub async fn show(session: &Session) -> Result<Response, AppError> {
    let cart = load_cart(session).await?;

    let items = cart
        .iter()
        .map(|item| CartItemView {
            id: item.id,
            name: item.name.clone(),
            price: item.price.to_string(),
            image: item.image.clone(),
        })
        .collect();
    let total = cart.total().to_string();

    let ctx = PageContext::gather(session).await?;
    Ok(CartTemplate { ctx, items, total }.into_response())
}

/// Add a course to the cart (async browser call).
///
/// The submitted fields are a snapshot of the course's purchasable
/// attributes; re-adding a course overwrites its entry. Malformed input
/// gets `success: false` with the unchanged count rather than an error
/// page, since the caller is a script.
#[instrument(skip(session, form))]
pub async fn add(session: &Session, form: AddToCartForm) -> Result<Response, AppError> {
    let mut cart = load_cart(session).await?;

    let parsed = form
        .course_id
        .parse::<i32>()
        .ok()
        .zip(form.price.parse::<Decimal>().ok());

    let Some((course_id, price)) = parsed else {
        tracing::debug!(course_id = %form.course_id, "rejected malformed add-to-cart");
        return Ok(Json(AddToCartResponse {
            success: false,
            cart_count: cart.count(),
        })
        .into_response());
    };

    cart.insert(CartItem {
        id: CourseId::new(course_id),
        name: form.course_name,
        price,
        image: form.image,
    });
    store_cart(session, &cart).await?;

    Ok(Json(AddToCartResponse {
        success: true,
        cart_count: cart.count(),
    })
    .into_response())
}

/// Remove a course from the cart, then return to the cart view.
#[instrument(skip(session, form))]
pub async fn update(session: &Session, form: UpdateCartForm) -> Result<Response, AppError> {
    if let Some(id) = form.remove.and_then(|raw| raw.parse::<i32>().ok()) {
        let mut cart = load_cart(session).await?;
        cart.remove(CourseId::new(id));
        store_cart(session, &cart).await?;
    }

    Ok(Redirect::to("/?view=cart").into_response())
}
