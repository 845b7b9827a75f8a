//! Error handling for the SecRest API
//!
//! This module provides a unified error type using thiserror, with
//! automatic HTTP status code mapping via Axum's IntoResponse trait.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::repositories::RepositoryError;
use crate::search::SearchError;

/// Realm advertised in `WWW-Authenticate` challenges
pub const AUTH_REALM: &str = "secrest";

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for client-side handling
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
}

/// Main API error type
#[derive(Error, Debug)]
pub enum ApiError {
    // ========== Authentication ==========
    /// Missing or wrong Basic credentials
    #[error("authentication required")]
    Unauthorized,

    // ========== Resource Errors ==========
    /// Requested resource not found
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Resource already exists (conflict)
    #[error("{resource_type} already exists: {id}")]
    Conflict {
        resource_type: &'static str,
        id: String,
    },

    /// The submitted resource is not in a state the operation accepts
    #[error("invalid resource state: {0}")]
    InvalidState(String),

    /// A page past the end of the collection was requested
    #[error("page {page} is out of bounds")]
    PageOutOfBounds { page: i64 },

    // ========== Request Errors ==========
    /// Body missing or not in a supported representation
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Body larger than the configured limit
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// Invalid request body format
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Path segment that does not parse
    #[error("invalid path parameter '{name}': {value}")]
    InvalidPathParam { name: &'static str, value: String },

    /// Invalid query parameter
    #[error("invalid query parameter '{name}': {reason}")]
    InvalidQueryParam { name: &'static str, reason: String },

    /// Search expression that cannot be evaluated
    #[error("invalid search: {0}")]
    InvalidSearch(#[from] SearchError),

    // ========== Internal Errors ==========
    /// Database query failed
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// Internal server error (catch-all for unexpected errors)
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 401 Unauthorized
            Self::Unauthorized => StatusCode::UNAUTHORIZED,

            // 404 Not Found
            Self::NotFound { .. } | Self::PageOutOfBounds { .. } => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::Conflict { .. } | Self::InvalidState(_) => StatusCode::CONFLICT,

            // 415 Unsupported Media Type
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,

            // 413 Payload Too Large
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,

            // 400 Bad Request
            Self::InvalidBody(_)
            | Self::InvalidPathParam { .. }
            | Self::InvalidQueryParam { .. }
            | Self::InvalidSearch(_) => StatusCode::BAD_REQUEST,

            // 500 Internal Server Error
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::PageOutOfBounds { .. } => "PAGE_OUT_OF_BOUNDS",
            Self::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            Self::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::InvalidPathParam { .. } => "INVALID_PATH_PARAM",
            Self::InvalidQueryParam { .. } => "INVALID_QUERY_PARAM",
            Self::InvalidSearch(_) => "INVALID_SEARCH",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Create a not found error for a specific resource
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// Create a conflict error for a specific resource
    pub fn conflict(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::Conflict {
            resource_type,
            id: id.into(),
        }
    }

    /// Log the error with appropriate severity based on status code
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Server error occurred"
            );
        } else if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Authentication error"
            );
        } else {
            tracing::debug!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Client error"
            );
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let error_response = ErrorResponse {
            code: self.error_code(),
            message: self.to_string(),
        };

        if let Self::Unauthorized = &self {
            return (
                status,
                [(
                    header::WWW_AUTHENTICATE,
                    format!("Basic realm=\"{}\"", AUTH_REALM),
                )],
                Json(error_response),
            )
                .into_response();
        }

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

// ========== Conversion Implementations ==========

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateName(name) => Self::conflict("privilege", name),
            RepositoryError::Database(e) => Self::Database(e),
        }
    }
}
