//! Handlers for the built-in credential service.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::auth::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest};
use crate::application::services::AccountService;
use crate::error::AppError;
use crate::infrastructure::auth::TOKEN_VALID_MESSAGE;
use crate::utils::bearer::bearer_token;

fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    })
}

/// `POST /auth/register`
///
/// Returns `{"message": "User registered successfully"}`. Mismatched or weak
/// passwords are 400, a taken username is 409.
pub async fn register_handler(
    State(accounts): State<Arc<AccountService>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let payload = parse_body(payload)?;
    payload.validate()?;

    accounts
        .register(&payload.username, &payload.password, &payload.verify_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "User registered successfully",
    }))
}

/// `POST /auth/login`
///
/// Returns a signed token. Unknown users and wrong passwords are both 401.
pub async fn login_handler(
    State(accounts): State<Arc<AccountService>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let payload = parse_body(payload)?;
    payload.validate()?;

    let token = accounts.login(&payload.username, &payload.password).await?;

    Ok(Json(LoginResponse {
        token,
        message: "User logged in successfully",
    }))
}

/// `GET /auth/verify`
///
/// The endpoint the remote credential gate calls. 200 with
/// `{"message": "Token is valid"}`, 400 without an `Authorization` header,
/// 401 for a bad or expired token.
pub async fn verify_handler(
    State(accounts): State<Arc<AccountService>>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, AppError> {
    let token = bearer_token(&headers).ok_or_else(|| {
        AppError::bad_request("Authorization header is required", json!({}))
    })?;

    accounts.verify(token)?;

    Ok(Json(MessageResponse {
        message: TOKEN_VALID_MESSAGE,
    }))
}
