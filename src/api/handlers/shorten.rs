//! Handler for the URL shortening endpoint.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::extract::JsonOrForm;
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a URL, reusing the existing short URL if it was submitted before.
///
/// # Endpoint
///
/// `POST /api/shorturl`
///
/// # Request Body
///
/// Form (`url=https://example.com`) or JSON:
///
/// ```json
/// { "url": "https://example.com" }
/// ```
///
/// # Response
///
/// ```json
/// { "original_url": "https://example.com", "short_url": 1 }
/// ```
///
/// # Errors
///
/// - `400 {"error":"invalid url"}` if the URL is malformed or its host does not resolve
/// - `500 {"error":"Database error"}` on storage failure
pub async fn shorten_handler(
    State(state): State<AppState>,
    JsonOrForm(payload): JsonOrForm<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let mapping = state.shorten_service.shorten(&payload.url).await?;

    Ok(Json(mapping.into()))
}
