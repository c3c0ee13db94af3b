//! Request extractors shared by API handlers.

use axum::{
    Form, Json,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Body extractor accepting either JSON or `application/x-www-form-urlencoded`.
///
/// JSON is chosen when the `Content-Type` names `application/json` or a
/// `+json` subtype, compared case-insensitively; everything else is parsed as
/// a form. Any rejection is reported as [`AppError::InvalidUrl`], since the
/// only body this service reads is a URL submission.
#[derive(Debug)]
pub struct JsonOrForm<T>(pub T);

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(is_json_content_type);

        if is_json {
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(|e| AppError::invalid_url(e.body_text()))?;
            let Json(payload) =
                Json::<T>::from_bytes(&bytes).map_err(|e| AppError::invalid_url(e.body_text()))?;
            Ok(Self(payload))
        } else {
            let Form(payload) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::invalid_url(e.body_text()))?;
            Ok(Self(payload))
        }
    }
}

/// Whether a `Content-Type` value denotes a JSON body.
///
/// Parameters such as `charset` are ignored.
fn is_json_content_type(value: &str) -> bool {
    let essence = value.split(';').next().unwrap_or_default().trim();
    let Some((kind, subtype)) = essence.split_once('/') else {
        return false;
    };

    if !kind.trim().eq_ignore_ascii_case("application") {
        return false;
    }

    let subtype = subtype.trim().to_ascii_lowercase();
    subtype == "json" || (subtype.len() > 5 && subtype.ends_with("+json"))
}
