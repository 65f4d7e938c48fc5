//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use learnsphere_core::{Email, Role, UserId};

use super::RepositoryError;
use crate::models::user::{User, UserWithPassword};

/// Raw row shape shared by the user queries.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    username: String,
    email: String,
    role: String,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct UserWithPasswordRow {
    id: i32,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role = self
            .role
            .parse::<Role>()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(User {
            id: UserId::new(self.id),
            username: self.username,
            email,
            role,
            created_at: self.created_at,
        })
    }
}

impl UserWithPasswordRow {
    fn into_user(self) -> Result<UserWithPassword, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role = self
            .role
            .parse::<Role>()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(UserWithPassword {
            user: User {
                id: UserId::new(self.id),
                username: self.username,
                email,
                role,
                created_at: self.created_at,
            },
            password_hash: self.password_hash,
        })
    }
}

// Identifier matching is case-insensitive, like the case-folding collation
// the original schema relied on; the LOWER() unique indexes are the backstop.
const IDENTIFIER_TAKEN_SQL: &str = r"
    SELECT EXISTS (
        SELECT 1 FROM users
        WHERE LOWER(email) = LOWER($1) OR LOWER(username) = LOWER($2)
    )
    ";

const GET_WITH_PASSWORD_BY_IDENTIFIER_SQL: &str = r"
    SELECT id, username, email, password_hash, role, created_at
    FROM users
    WHERE LOWER(email) = LOWER($1) OR LOWER(username) = LOWER($1)
    ";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Check whether the email or username is already registered, ignoring
    /// case.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn identifier_taken(
        &self,
        email: &Email,
        username: &str,
    ) -> Result<bool, RepositoryError> {
        let taken: bool = sqlx::query_scalar(IDENTIFIER_TAKEN_SQL)
            .bind(email.as_str())
            .bind(username)
            .fetch_one(self.pool)
            .await?;

        Ok(taken)
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email or username already
    /// exists. Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &str,
        email: &Email,
        password_hash: &str,
        role: Role,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, role, created_at
            ",
        )
        .bind(username)
        .bind(email.as_str())
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email or username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_user()
    }

    /// Get a user and their password hash by email or username.
    ///
    /// The identifier matches either column case-insensitively, mirroring
    /// the login form which accepts both.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_with_password_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<UserWithPassword>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithPasswordRow>(GET_WITH_PASSWORD_BY_IDENTIFIER_SQL)
            .bind(identifier)
            .fetch_optional(self.pool)
            .await?;

        row.map(UserWithPasswordRow::into_user).transpose()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, username, email, role, created_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Registering Alice@Example.com over alice@example.com must hit the
    // duplicate check, and a re-cased identifier must still log in. Both
    // statements fold each compared column and its bound value.
    #[test]
    fn test_identifier_queries_fold_case() {
        for sql in [IDENTIFIER_TAKEN_SQL, GET_WITH_PASSWORD_BY_IDENTIFIER_SQL] {
            assert!(sql.contains("LOWER(email) = LOWER($1)"));
            assert!(sql.contains("OR LOWER(username) = LOWER("));
        }
    }
}
