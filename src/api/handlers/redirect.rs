//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use crate::state::AppState;

/// Redirects a short code to its long URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Response Codes
///
/// - **301 Moved Permanently** with `Location` on success
/// - **404 Not Found** for unknown or malformed codes
/// - **500 Internal Server Error** if the cache missed and the store is down
///
/// Error responses carry no body. See
/// [`crate::application::services::ResolutionService`] for the lookup order.
pub async fn redirect_handler(Path(code): Path<String>, State(state): State<AppState>) -> Response {
    let resolution = match state.resolution_service.resolve(&code).await {
        Ok(resolution) => resolution,
        Err(e) => {
            let status = e.status();
            if status.is_server_error() {
                error!(code = %code, "Redirect failed: {}", e);
            } else {
                debug!(code = %code, "Redirect miss: {}", e);
            }
            return status.into_response();
        }
    };

    match HeaderValue::from_str(&resolution.long_url) {
        Ok(location) => (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response(),
        Err(_) => {
            error!(code = %code, "Stored URL is not a valid Location header value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
