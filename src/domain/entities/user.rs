//! User account entity for the credential service.

use chrono::{DateTime, Utc};

/// A registered account. Only the Argon2 PHC hash of the password is kept.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for registering an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}
