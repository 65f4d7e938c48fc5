//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! ls-cli admin create -u admin -e admin@example.com -p "a strong passphrase"
//! ```
//!
//! # Environment Variables
//!
//! - `STORE_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)

use sqlx::PgPool;
use thiserror::Error;

use learnsphere_core::{Email, Role};
use learnsphere_storefront::db::{RepositoryError, UserRepository};
use learnsphere_storefront::services::auth::{self, AuthError, MIN_PASSWORD_LENGTH};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password too short.
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// Username or email taken.
    #[error("A user already exists with that username or email")]
    UserExists,

    /// Repository error.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing failed.
    #[error("Password hashing failed")]
    PasswordHash,
}

/// Create a new admin account.
///
/// # Errors
///
/// Returns `AdminError` if validation fails, the identifier is taken, or
/// the database is unreachable.
pub async fn create(username: &str, email: &str, password: &str) -> Result<i32, AdminError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email).map_err(|e| AdminError::InvalidEmail(e.to_string()))?;
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AdminError::WeakPassword);
    }

    let database_url = std::env::var("STORE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| AdminError::MissingEnvVar("STORE_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let users = UserRepository::new(&pool);
    if users.identifier_taken(&email, username).await? {
        return Err(AdminError::UserExists);
    }

    let password_hash = auth::hash_password(password).map_err(|e| match e {
        AuthError::PasswordHash => AdminError::PasswordHash,
        other => AdminError::Repository(RepositoryError::DataCorruption(other.to_string())),
    })?;

    let user = users
        .create(username, &email, &password_hash, Role::Admin)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::UserExists,
            other => AdminError::Repository(other),
        })?;

    tracing::info!(
        "Admin account created! ID: {}, Username: {}, Email: {}",
        user.id,
        user.username,
        user.email
    );

    Ok(user.id.as_i32())
}
