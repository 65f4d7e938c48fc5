//! Purchase transaction models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use learnsphere_core::{OrderStatus, TransactionId, UserId};

/// A recorded purchase, as listed on the admin dashboard.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: TransactionId,
    /// Set when the buyer was logged in at checkout.
    pub user_id: Option<UserId>,
    /// Joined from the users table; `None` for guest purchases.
    pub username: Option<String>,
    /// Contact email entered on the payment form.
    pub email: String,
    /// The UPI transaction reference the buyer typed in. Taken on trust;
    /// an admin verifies it against the payment provider before confirming.
    pub payment_reference: String,
    /// Comma-separated course names, denormalized at checkout time.
    pub courses_purchased: String,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub purchase_timestamp: DateTime<Utc>,
}

/// Data for inserting a new pending transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: Option<UserId>,
    pub email: String,
    pub payment_reference: String,
    pub courses_purchased: String,
    pub total_amount: Decimal,
}
