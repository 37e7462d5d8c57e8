//! API route configuration.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{login_handler, register_handler, shorten_handler, verify_handler};
use crate::application::services::AccountService;
use crate::state::AppState;

/// Routes that allocate mappings. The credential check happens inside the
/// handler so a rejected caller never reaches body parsing.
///
/// - `POST /shorten`
pub fn shorten_routes() -> Router<AppState> {
    Router::new().route("/shorten", post(shorten_handler))
}

/// Built-in credential service, carrying its own state.
///
/// - `POST /auth/register`
/// - `POST /auth/login`
/// - `GET  /auth/verify`
pub fn account_routes<S>(accounts: Arc<AccountService>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/verify", get(verify_handler))
        .with_state(accounts)
}
