//! Transaction repository for purchase records.
//!
//! Transactions are inserted `Pending` at checkout and flipped to
//! `Confirmed` by an admin after verifying the UPI payment by hand.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use learnsphere_core::{OrderStatus, TransactionId, UserId};

use super::RepositoryError;
use crate::models::transaction::{NewTransaction, Transaction};

#[derive(sqlx::FromRow)]
struct TransactionRow {
    id: i32,
    user_id: Option<i32>,
    email: String,
    transaction_id: String,
    courses_purchased: String,
    total_amount: Decimal,
    order_status: String,
    purchase_timestamp: DateTime<Utc>,
    // NULL when the purchase was made while logged out or the user was deleted
    username: Option<String>,
}

impl TransactionRow {
    fn into_transaction(self) -> Result<Transaction, RepositoryError> {
        let status = self
            .order_status
            .parse::<OrderStatus>()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Transaction {
            id: TransactionId::new(self.id),
            user_id: self.user_id.map(UserId::new),
            username: self.username,
            email: self.email,
            payment_reference: self.transaction_id,
            courses_purchased: self.courses_purchased,
            total_amount: self.total_amount,
            status,
            purchase_timestamp: self.purchase_timestamp,
        })
    }
}

/// Repository for transaction database operations.
pub struct TransactionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TransactionRepository<'a> {
    /// Create a new transaction repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new pending transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewTransaction) -> Result<TransactionId, RepositoryError> {
        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO transactions
                (user_id, email, transaction_id, courses_purchased, total_amount, order_status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(new.user_id.map(UserId::as_i32))
        .bind(&new.email)
        .bind(&new.payment_reference)
        .bind(&new.courses_purchased)
        .bind(new.total_amount)
        .bind(OrderStatus::Pending.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(TransactionId::new(id))
    }

    /// List all transactions, newest first, with the purchaser's username
    /// joined in where one exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_with_usernames(&self) -> Result<Vec<Transaction>, RepositoryError> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r"
            SELECT t.id, t.user_id, t.email, t.transaction_id, t.courses_purchased,
                   t.total_amount, t.order_status, t.purchase_timestamp,
                   u.username
            FROM transactions t
            LEFT JOIN users u ON u.id = t.user_id
            ORDER BY t.purchase_timestamp DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(TransactionRow::into_transaction)
            .collect()
    }

    /// Mark a transaction as confirmed.
    ///
    /// Returns `true` if a row was updated, `false` if no transaction with
    /// that ID exists. Confirming an already-confirmed transaction is a
    /// harmless no-op that still returns `true`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn confirm(&self, id: TransactionId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE transactions
            SET order_status = $1
            WHERE id = $2
            ",
        )
        .bind(OrderStatus::Confirmed.as_str())
        .bind(id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
