//! Structural URL validation.

use async_trait::async_trait;
use url::Url;

use super::UrlValidator;
use crate::error::AppError;

/// Parses `raw` and checks that it is an absolute `http`/`https` URL with a host.
///
/// # Errors
///
/// Returns [`AppError::InvalidUrl`] for unparsable input, other schemes
/// (`ftp:`, `javascript:`, ...) and URLs without a host.
pub fn parse_http_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw.trim()).map_err(|e| AppError::invalid_url(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AppError::invalid_url(format!(
                "unsupported scheme '{other}'"
            )));
        }
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(AppError::invalid_url("missing host")),
    }
}

/// Validator that accepts any well-formed HTTP(S) URL without network access.
#[derive(Debug, Default, Clone)]
pub struct SyntaxUrlValidator;

impl SyntaxUrlValidator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UrlValidator for SyntaxUrlValidator {
    async fn validate(&self, raw: &str) -> Result<(), AppError> {
        parse_http_url(raw).map(|_| ())
    }
}
