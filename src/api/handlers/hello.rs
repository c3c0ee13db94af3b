//! Static greeting endpoint.

use axum::Json;

use crate::api::dto::shorten::HelloResponse;

/// `GET /api/hello`
pub async fn hello_handler() -> Json<HelloResponse> {
    Json(HelloResponse {
        greeting: "hello API",
    })
}
