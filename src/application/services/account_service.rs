//! Account registration, login, and token verification for the co-located
//! credential service.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::{StoreError, UserRepository};
use crate::error::AppError;
use crate::infrastructure::auth::password::{hash_password, verify_password};
use crate::infrastructure::auth::{Claims, JwtError, JwtIssuer};

/// Symbols that satisfy the special-character rule.
pub const PASSWORD_SPECIALS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Minimum password length in characters.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Returns true if `password` has at least [`PASSWORD_MIN_LENGTH`] characters
/// and contains an uppercase letter, a lowercase letter, a digit, and one of
/// [`PASSWORD_SPECIALS`].
pub fn check_password_complexity(password: &str) -> bool {
    password.chars().count() >= PASSWORD_MIN_LENGTH
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

pub struct AccountService {
    users: Arc<dyn UserRepository>,
    issuer: Arc<JwtIssuer>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, issuer: Arc<JwtIssuer>) -> Self {
        Self { users, issuer }
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the passwords differ or the password
    /// is too weak, and [`AppError::Conflict`] if the username is taken.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        verify_password: &str,
    ) -> Result<User, AppError> {
        if password != verify_password {
            return Err(AppError::bad_request(
                "Passwords do not match",
                json!({ "field": "verify_password" }),
            ));
        }

        if !check_password_complexity(password) {
            return Err(AppError::bad_request(
                "Password does not meet complexity requirements",
                json!({
                    "min_length": PASSWORD_MIN_LENGTH,
                    "requires": ["uppercase", "lowercase", "digit", "special"],
                }),
            ));
        }

        let password_hash = hash_password(password).map_err(|e| {
            AppError::internal("Failed to hash password", json!({ "reason": e.to_string() }))
        })?;

        let new_user = NewUser {
            username: username.to_string(),
            password_hash,
        };

        match self.users.create(new_user).await {
            Ok(user) => {
                info!(username = %user.username, "Registered account");
                Ok(user)
            }
            Err(StoreError::Duplicate { .. }) => Err(AppError::conflict(
                "Username already exists",
                json!({ "username": username }),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Checks credentials and issues a token.
    ///
    /// Unknown usernames and wrong passwords produce the same error.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let user = self.users.find_by_username(username).await?;

        let Some(user) = user.filter(|u| verify_password(password, &u.password_hash)) else {
            warn!(username, "Rejected login");
            return Err(AppError::unauthorized(
                "Invalid username or password",
                json!({}),
            ));
        };

        self.issuer
            .issue(&user.username, user.id)
            .map_err(|e| AppError::internal("Failed to issue token", json!({ "reason": e.to_string() })))
    }

    /// Verifies a token's signature, issuer, and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        self.issuer.verify(token).map_err(|e| {
            let reason = match e {
                JwtError::Expired => "Token expired".to_string(),
                other => other.to_string(),
            };
            AppError::unauthorized("Invalid token", json!({ "reason": reason }))
        })
    }
}
