//! Middleware and extractors for the SecRest API
//!
//! - `require_basic_auth`: guards `/api` with HTTP Basic credentials
//! - `JsonBody`: JSON body extractor with 415/400 rejections

pub mod auth;
pub mod body;

pub use auth::{extract_basic_credentials, require_basic_auth, BasicCredentials};
pub use body::JsonBody;
