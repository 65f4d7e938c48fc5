//! User domain models.

use chrono::{DateTime, Utc};

use learnsphere_core::{Email, Role, UserId};

/// A registered user.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// A user together with their Argon2 password hash.
///
/// Only the login path needs the hash; everything else works with [`User`].
#[derive(Debug, Clone)]
pub struct UserWithPassword {
    pub user: User,
    pub password_hash: String,
}
