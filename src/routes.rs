//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`          - Short link redirect (public)
//! - `GET  /health`          - Health check: database and cache (public)
//! - `POST /shorten`         - Allocate a short code (Bearer token)
//! - `/auth/*`               - Built-in credential service, when enabled
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin, JSON and `Authorization` headers
//! - **Path normalization** - Trailing slash handling

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{cors, tracing};
use crate::application::services::AccountService;
use crate::state::AppState;

/// Constructs the application router with all routes and middleware.
///
/// `accounts` mounts the `/auth/*` routes; pass `None` when tokens are
/// verified by an external credential service only.
pub fn app_router(state: AppState, accounts: Option<Arc<AccountService>>) -> NormalizePath<Router> {
    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .merge(api::routes::shorten_routes());

    if let Some(accounts) = accounts {
        router = router.merge(api::routes::account_routes(accounts));
    }

    let router = router
        .with_state(state)
        .layer(cors::layer())
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
