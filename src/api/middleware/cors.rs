//! Cross-origin resource sharing.

use tower_http::cors::CorsLayer;

/// Allows any origin, method and header.
///
/// The API is meant to be called from browser pages hosted elsewhere.
pub fn layer() -> CorsLayer {
    CorsLayer::permissive()
}
