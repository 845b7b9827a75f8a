//! HTTP Basic authentication for the API routes
//!
//! A single configured account guards everything under `/api`. Requests
//! with a missing, malformed or wrong `Authorization` header get
//! `401 Unauthorized` with a `WWW-Authenticate: Basic` challenge.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use secrest_shared_config::CredentialsConfig;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::ApiError;

/// Credentials decoded from an `Authorization: Basic` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    /// Check against the configured account
    ///
    /// Both fields are always compared, over fixed-length digests.
    pub fn matches(&self, expected: &CredentialsConfig) -> bool {
        let username = digests_equal(&self.username, &expected.username);
        let password = digests_equal(&self.password, &expected.password);
        username & password
    }
}

fn digests_equal(given: &str, expected: &str) -> bool {
    let given = Sha256::digest(given.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());

    given
        .iter()
        .zip(expected.iter())
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

/// Decode Basic credentials from request headers
///
/// Returns `None` if the header is absent, uses another scheme, or does
/// not decode to `username:password`.
pub fn extract_basic_credentials(headers: &HeaderMap) -> Option<BasicCredentials> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Middleware rejecting requests that do not carry the configured credentials
pub async fn require_basic_auth(
    State(expected): State<Arc<CredentialsConfig>>,
    headers: HeaderMap,
    request: Request<Body>,
    next: Next,
) -> Response {
    match extract_basic_credentials(&headers) {
        Some(given) if given.matches(&expected) => next.run(request).await,
        Some(given) => {
            debug!(username = %given.username, "Rejected Basic credentials");
            ApiError::Unauthorized.into_response()
        }
        None => ApiError::Unauthorized.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_valid_basic_credentials() {
        let headers = headers_with("Basic YWRtaW46YWRtaW5wYXNz");
        assert_eq!(
            extract_basic_credentials(&headers),
            Some(BasicCredentials {
                username: "admin".to_string(),
                password: "adminpass".to_string(),
            })
        );
    }

    #[test]
    fn test_password_may_contain_colon() {
        let encoded = STANDARD.encode("user:pa:ss");
        let creds = extract_basic_credentials(&headers_with(&format!("Basic {}", encoded)))
            .unwrap();
        assert_eq!(creds.username, "user");
        assert_eq!(creds.password, "pa:ss");
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(extract_basic_credentials(&HeaderMap::new()), None);
    }

    #[test]
    fn test_bearer_scheme_rejected() {
        assert_eq!(
            extract_basic_credentials(&headers_with("Bearer some_token")),
            None
        );
    }

    #[test]
    fn test_invalid_base64_rejected() {
        assert_eq!(
            extract_basic_credentials(&headers_with("Basic !!not-base64!!")),
            None
        );
    }

    #[test]
    fn test_credentials_match_configured_account() {
        let expected = CredentialsConfig::new("admin", "adminpass");
        let given = |username: &str, password: &str| BasicCredentials {
            username: username.to_string(),
            password: password.to_string(),
        };

        assert!(given("admin", "adminpass").matches(&expected));
        assert!(!given("admin", "adminpas").matches(&expected));
        assert!(!given("admin", "adminpass ").matches(&expected));
        assert!(!given("root", "adminpass").matches(&expected));
        assert!(!given("", "").matches(&expected));
    }

    #[test]
    fn test_digests_equal() {
        assert!(digests_equal("secret", "secret"));
        assert!(!digests_equal("secret", "Secret"));
        assert!(!digests_equal("secret", "secret-but-longer"));
    }

    #[test]
    fn test_missing_colon_rejected() {
        let encoded = STANDARD.encode("justuser");
        assert_eq!(
            extract_basic_credentials(&headers_with(&format!("Basic {}", encoded))),
            None
        );
    }
}
