//! DTOs for the URL shortening endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::UrlMapping;

/// Request to shorten a URL.
///
/// Accepted as a form field or as a JSON property, both named `url`.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(url(message = "invalid url"))]
    pub url: String,
}

/// Successful shortening result.
///
/// ```json
/// { "original_url": "https://example.com", "short_url": 1 }
/// ```
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub original_url: String,
    pub short_url: i64,
}

impl From<UrlMapping> for ShortenResponse {
    fn from(mapping: UrlMapping) -> Self {
        Self {
            original_url: mapping.original_url,
            short_url: mapping.identifier,
        }
    }
}

/// Static greeting returned by `GET /api/hello`.
#[derive(Debug, Serialize)]
pub struct HelloResponse {
    pub greeting: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_non_url() {
        let request = ShortenRequest {
            url: "not a url".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_url() {
        let request = ShortenRequest {
            url: "https://www.freecodecamp.org".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_response_field_names() {
        let response = ShortenResponse::from(UrlMapping::new(3, "https://example.com"));
        let json = serde_json::to_value(response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "original_url": "https://example.com", "short_url": 3 })
        );
    }
}
