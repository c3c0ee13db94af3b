//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`          - Landing page (`views/index.html`)
//! - `GET  /health`    - Health check
//! - `/api/*`          - Shortener API (public)
//! - `/public/*`       - Static assets
//!
//! # Middleware
//!
//! - **CORS** - Any origin
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use std::path::Path;

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::{ServeDir, ServeFile};

/// Router with the health check and the API, without static files.
///
/// Used directly by integration tests.
pub fn service_router(state: AppState) -> Router {
    with_middleware(routes(state))
}

/// Constructs the full application router.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `views_dir` - directory holding `index.html`
/// - `static_dir` - directory served under `/public`
pub fn app_router(state: AppState, views_dir: &Path, static_dir: &Path) -> NormalizePath<Router> {
    let router = routes(state)
        .route_service("/", ServeFile::new(views_dir.join("index.html")))
        .nest_service("/public", ServeDir::new(static_dir));

    NormalizePathLayer::trim_trailing_slash().layer(with_middleware(router))
}

fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api::routes::api_routes())
        .with_state(state)
}

fn with_middleware(router: Router) -> Router {
    router.layer(cors::layer()).layer(tracing::layer())
}
