//! DTOs for the credential endpoints.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("valid username regex"));

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    #[validate(regex(
        path = "*USERNAME_REGEX",
        message = "Username may only contain letters, digits, '_', '.' and '-'"
    ))]
    pub username: String,

    pub password: String,

    pub verify_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: "Str0ng!pass".to_string(),
            verify_password: "Str0ng!pass".to_string(),
        }
    }

    #[test]
    fn test_username_rules() {
        assert!(register("alice").validate().is_ok());
        assert!(register("a.b-c_1").validate().is_ok());
        assert!(register("al").validate().is_err());
        assert!(register("alice smith").validate().is_err());
        assert!(register(&"a".repeat(51)).validate().is_err());
    }

    #[test]
    fn test_login_requires_fields() {
        let req = LoginRequest {
            username: String::new(),
            password: "x".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
