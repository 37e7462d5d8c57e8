//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{CACHE_UNAVAILABLE_WARNING, ShortenRequest, ShortenResponse};
use crate::application::services::CacheWrite;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::bearer::bearer_token;

/// Allocates a short code for a long URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request
///
/// `Authorization: Bearer <token>` plus
///
/// ```json
/// { "long_url": "https://example.com/some/page", "owner": "u1" }
/// ```
///
/// # Response
///
/// ```json
/// { "code": "aB3xY9", "short_url": "http://localhost:8080/aB3xY9" }
/// ```
///
/// When the mapping was stored but the cache could not be primed, the
/// response also carries `"warning": "cache_unavailable"`.
///
/// # Errors
///
/// - 401 if the credential gate rejects the token (checked before the body)
/// - 400 if the body is not valid JSON or fails validation
/// - 500 if the store is unavailable or no free code could be found
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    state
        .allocation_service
        .authorize(bearer_token(&headers))
        .await?;

    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    })?;
    payload.validate()?;

    let allocation = state
        .allocation_service
        .allocate(payload.long_url, payload.owner)
        .await?;

    let warning = match allocation.cache {
        CacheWrite::Primed => None,
        CacheWrite::Failed(_) => Some(CACHE_UNAVAILABLE_WARNING),
    };

    let short_url = state.short_url(&allocation.mapping.code);

    Ok(Json(ShortenResponse {
        code: allocation.mapping.code,
        short_url,
        warning,
    }))
}
