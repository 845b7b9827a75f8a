//! JSON request body extractor
//!
//! Like `axum::Json`, but reports failures through [`ApiError`]: a
//! missing or non-JSON `Content-Type` or an empty body is
//! `415 Unsupported Media Type`; a body over the configured limit is
//! `413 Payload Too Large`; a body that is not valid JSON for the
//! target type is `400 Bad Request`.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Deserialized JSON request body
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

fn json_content_type(headers: &HeaderMap) -> Result<(), ApiError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::UnsupportedMediaType("missing content type".to_string()))?;

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let is_json = mime == "application/json"
        || (mime.starts_with("application/") && mime.ends_with("+json"));

    if is_json {
        Ok(())
    } else {
        Err(ApiError::UnsupportedMediaType(content_type.to_string()))
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        json_content_type(req.headers())?;

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| {
                if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    ApiError::PayloadTooLarge(e.body_text())
                } else {
                    ApiError::InvalidBody(e.body_text())
                }
            })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(ApiError::UnsupportedMediaType("empty body".to_string()));
        }

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| ApiError::InvalidBody(e.to_string()))
    }
}
