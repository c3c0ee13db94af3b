//! URL validation performed before a URL is handed to the allocator.
//!
//! - [`UrlValidator`] - validation contract
//! - [`SyntaxUrlValidator`] - structural checks only
//! - [`DnsUrlValidator`] - structural checks plus host resolution

pub mod dns;
pub mod syntax;

pub use dns::DnsUrlValidator;
pub use syntax::{SyntaxUrlValidator, parse_http_url};

use crate::error::AppError;
use async_trait::async_trait;

/// Decides whether a submitted URL may be shortened.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlValidator: Send + Sync {
    /// Validates `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] if the URL is rejected.
    async fn validate(&self, raw: &str) -> Result<(), AppError>;
}
