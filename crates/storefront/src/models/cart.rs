//! Session-backed shopping cart.
//!
//! The cart is stored whole in the session record, keyed by course ID.
//! Courses are digital goods, so there are no quantities: a course is
//! either in the cart or not, and adding it again is a no-op upsert.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use learnsphere_core::CourseId;

/// One course in the cart, snapshotted from the submitted form at add time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItem {
    pub id: CourseId,
    pub name: String,
    pub price: Decimal,
    pub image: String,
}

/// The shopping cart, serialized into the session.
///
/// `BTreeMap` keeps items ordered by course ID so cart listings and the
/// checkout course-name summary are deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cart {
    items: BTreeMap<CourseId, CartItem>,
}

impl Cart {
    /// Add a course to the cart. Adding an already-present course replaces
    /// its entry and does not grow the cart.
    pub fn insert(&mut self, item: CartItem) {
        self.items.insert(item.id, item);
    }

    /// Remove a course from the cart. Unknown IDs are ignored.
    pub fn remove(&mut self, id: CourseId) {
        self.items.remove(&id);
    }

    /// Empty the cart (after a completed checkout).
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct courses in the cart (the header badge count).
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Sum of item prices.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.values().map(|item| item.price).sum()
    }

    /// Items in ascending course-ID order.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.items.values()
    }

    /// Comma-separated course names in ID order, recorded on the
    /// transaction at checkout.
    #[must_use]
    pub fn course_names(&self) -> String {
        self.items
            .values()
            .map(|item| item.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: i32, name: &str, price: u32) -> CartItem {
        CartItem {
            id: CourseId::new(id),
            name: name.to_string(),
            price: Decimal::from(price),
            image: format!("https://example.com/{id}.jpg"),
        }
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut cart = Cart::default();
        cart.insert(item(1, "Web Development Fundamentals", 49));
        cart.insert(item(1, "Web Development Fundamentals", 49));

        assert_eq!(cart.count(), 1);
        assert_eq!(cart.total(), Decimal::from(49u32));
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut cart = Cart::default();
        cart.insert(item(1, "Web Development Fundamentals", 49));
        cart.remove(CourseId::new(99));

        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_total_sums_prices() {
        let mut cart = Cart::default();
        cart.insert(item(1, "Web Development Fundamentals", 49));
        cart.insert(item(3, "Python for Data Science", 59));

        assert_eq!(cart.total(), Decimal::from(108u32));
    }

    #[test]
    fn test_course_names_in_id_order() {
        let mut cart = Cart::default();
        cart.insert(item(3, "Python for Data Science", 59));
        cart.insert(item(1, "Web Development Fundamentals", 49));

        assert_eq!(
            cart.course_names(),
            "Web Development Fundamentals, Python for Data Science"
        );
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::default();
        cart.insert(item(2, "Graphic Design Principles", 39));
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut cart = Cart::default();
        cart.insert(item(4, "Digital Marketing Mastery", 45));

        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
