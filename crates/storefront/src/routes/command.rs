//! POST command dispatch.
//!
//! The storefront has a single POST endpoint; the submitted form names one
//! of a small set of sentinel fields to say which action it wants. That is
//! parsed here into an explicit [`Command`] so each handler validates its
//! own payload independently and nothing depends on handler ordering.

use std::collections::HashMap;

/// Registration form payload.
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Login form payload. The identifier matches email or username.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub identifier: String,
    pub password: String,
}

/// Cart update payload; currently only removal is supported.
#[derive(Debug, Clone)]
pub struct UpdateCartForm {
    /// Course ID to remove, as submitted.
    pub remove: Option<String>,
}

/// Checkout confirmation payload.
#[derive(Debug, Clone)]
pub struct ConfirmPurchaseForm {
    pub email: String,
    /// Free-text UPI payment reference asserted by the buyer.
    pub transaction_id: String,
}

/// Admin order confirmation payload.
#[derive(Debug, Clone)]
pub struct ConfirmOrderForm {
    /// Transaction row ID, as submitted.
    pub transaction_id: String,
}

/// Asynchronous add-to-cart payload. Fields stay raw strings here; the
/// handler parses them and answers `success: false` JSON on bad input
/// instead of an error page.
#[derive(Debug, Clone)]
pub struct AddToCartForm {
    pub course_id: String,
    pub course_name: String,
    pub price: String,
    pub image: String,
}

/// A parsed POST command.
#[derive(Debug, Clone)]
pub enum Command {
    Register(RegisterForm),
    Login(LoginForm),
    UpdateCart(UpdateCartForm),
    ConfirmPurchase(ConfirmPurchaseForm),
    ConfirmOrder(ConfirmOrderForm),
    AddToCart(AddToCartForm),
}

impl Command {
    /// Parse a form body into a command by sentinel field.
    ///
    /// Sentinels are checked in a fixed order so a pathological body naming
    /// several of them resolves deterministically. Returns `None` when no
    /// sentinel is present; absent payload fields default to empty strings
    /// and fail each handler's own validation.
    #[must_use]
    pub fn parse(form: &HashMap<String, String>) -> Option<Self> {
        let field = |name: &str| form.get(name).cloned().unwrap_or_default();

        if form.contains_key("register") {
            return Some(Self::Register(RegisterForm {
                username: field("username"),
                email: field("email"),
                password: field("password"),
                confirm_password: field("confirm_password"),
            }));
        }

        if form.contains_key("login") {
            return Some(Self::Login(LoginForm {
                identifier: field("email_username"),
                password: field("password"),
            }));
        }

        if form.contains_key("update_cart") {
            return Some(Self::UpdateCart(UpdateCartForm {
                remove: form.get("remove").cloned(),
            }));
        }

        if form.contains_key("confirm_purchase") {
            return Some(Self::ConfirmPurchase(ConfirmPurchaseForm {
                email: field("email"),
                transaction_id: field("transaction_id"),
            }));
        }

        if form.contains_key("confirm_order") {
            return Some(Self::ConfirmOrder(ConfirmOrderForm {
                transaction_id: field("transaction_id"),
            }));
        }

        if form.contains_key("add_to_cart") {
            return Some(Self::AddToCart(AddToCartForm {
                course_id: field("course_id"),
                course_name: field("course_name"),
                price: field("price"),
                image: field("image"),
            }));
        }

        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_register_sentinel() {
        let body = form(&[
            ("register", "1"),
            ("username", "asha"),
            ("email", "asha@example.com"),
            ("password", "secret1"),
            ("confirm_password", "secret1"),
        ]);

        match Command::parse(&body).unwrap() {
            Command::Register(f) => {
                assert_eq!(f.username, "asha");
                assert_eq!(f.email, "asha@example.com");
            }
            other => panic!("expected Register, got {other:?}"),
        }
    }

    #[test]
    fn test_login_sentinel_reads_identifier() {
        let body = form(&[
            ("login", ""),
            ("email_username", "asha"),
            ("password", "secret1"),
        ]);

        match Command::parse(&body).unwrap() {
            Command::Login(f) => assert_eq!(f.identifier, "asha"),
            other => panic!("expected Login, got {other:?}"),
        }
    }

    #[test]
    fn test_update_cart_without_remove_field() {
        let body = form(&[("update_cart", "1")]);

        match Command::parse(&body).unwrap() {
            Command::UpdateCart(f) => assert!(f.remove.is_none()),
            other => panic!("expected UpdateCart, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_payload_fields_default_empty() {
        let body = form(&[("confirm_purchase", "1")]);

        match Command::parse(&body).unwrap() {
            Command::ConfirmPurchase(f) => {
                assert_eq!(f.email, "");
                assert_eq!(f.transaction_id, "");
            }
            other => panic!("expected ConfirmPurchase, got {other:?}"),
        }
    }

    #[test]
    fn test_no_sentinel_is_none() {
        let body = form(&[("email", "asha@example.com")]);
        assert!(Command::parse(&body).is_none());
    }

    #[test]
    fn test_sentinel_precedence_is_fixed() {
        // A body naming two sentinels resolves to the earlier one.
        let body = form(&[("register", "1"), ("login", "1")]);
        assert!(matches!(Command::parse(&body), Some(Command::Register(_))));
    }

    #[test]
    fn test_add_to_cart_keeps_raw_strings() {
        let body = form(&[
            ("add_to_cart", "1"),
            ("course_id", "not-a-number"),
            ("course_name", "X"),
            ("price", "49"),
            ("image", "https://example.com/x.jpg"),
        ]);

        match Command::parse(&body).unwrap() {
            Command::AddToCart(f) => assert_eq!(f.course_id, "not-a-number"),
            other => panic!("expected AddToCart, got {other:?}"),
        }
    }
}
