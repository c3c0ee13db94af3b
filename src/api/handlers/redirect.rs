//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short URL to its original URL.
///
/// # Endpoint
///
/// `GET /api/shorturl/{short_url}`
///
/// # Response
///
/// `302 Found` with `Location` set to the original URL.
///
/// # Errors
///
/// Returns `404 {"error":"No short URL found for the given input"}` for
/// identifiers that were never allocated, including non-numeric input.
pub async fn redirect_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mapping = state.shorten_service.lookup_raw(&short_url).await?;

    debug!("Redirecting {} -> {}", short_url, mapping.original_url);

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, mapping.original_url)],
    ))
}
