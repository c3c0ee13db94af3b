//! Application error type and its HTTP representation.
//!
//! Every failure is converted at the request boundary into one of the three
//! JSON bodies the public API has always returned:
//!
//! | Variant                        | Status | Body                                                  |
//! |--------------------------------|--------|-------------------------------------------------------|
//! | [`AppError::InvalidUrl`]       | 400    | `{"error":"invalid url"}`                             |
//! | [`AppError::NotFound`]         | 404    | `{"error":"No short URL found for the given input"}`  |
//! | [`AppError::Storage`]/Conflict | 500    | `{"error":"Database error"}`                          |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub const INVALID_URL_MESSAGE: &str = "invalid url";
pub const NOT_FOUND_MESSAGE: &str = "No short URL found for the given input";
pub const DATABASE_ERROR_MESSAGE: &str = "Database error";

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The submitted URL is malformed or its host does not resolve.
    #[error("invalid url: {reason}")]
    InvalidUrl { reason: String },

    /// No mapping exists for the requested short URL.
    #[error("no short URL found for input {input:?}")]
    NotFound { input: String },

    /// A uniqueness constraint rejected a write.
    ///
    /// Raised by stores on `put`; the allocator resolves it by re-reading or retrying.
    #[error("mapping conflict: {0}")]
    Conflict(String),

    /// The underlying store failed to read or write.
    #[error("storage error: {0}")]
    Storage(String),
}

impl AppError {
    pub fn invalid_url(reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            reason: reason.into(),
        }
    }

    pub fn not_found(input: impl Into<String>) -> Self {
        Self::NotFound {
            input: input.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Public message placed in the `error` field of the response body.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::InvalidUrl { .. } => INVALID_URL_MESSAGE,
            AppError::NotFound { .. } => NOT_FOUND_MESSAGE,
            AppError::Conflict(_) | AppError::Storage(_) => DATABASE_ERROR_MESSAGE,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Storage(_) | AppError::Conflict(_) => tracing::error!("{}", self),
            AppError::InvalidUrl { .. } => tracing::debug!("{}", self),
            AppError::NotFound { .. } => tracing::debug!("{}", self),
        }

        let body = ErrorBody {
            error: self.public_message(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(format!(
                "unique constraint violation ({})",
                db.constraint().unwrap_or("unknown")
            ));
        }

        AppError::storage(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::invalid_url(e.to_string())
    }
}
