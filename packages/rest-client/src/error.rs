//! REST client error types

use thiserror::Error;

/// REST client errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed at the transport level
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be (de)serialized
    #[error("failed to marshal resource: {0}")]
    Marshal(#[from] serde_json::Error),

    /// A URI could not be built or resolved
    #[error("invalid URI: {0}")]
    Url(#[from] url::ParseError),

    /// A resource the caller expected to exist is absent
    #[error("no resource found at {0}")]
    ResourceAbsent(String),

    /// The server answered with a status the operation does not accept
    #[error("unexpected status {status} for {method} {uri}")]
    UnexpectedStatus {
        method: &'static str,
        uri: String,
        status: u16,
    },

    /// A search expected to match at most one resource matched several
    #[error("search matched {0} resources, expected at most one")]
    AmbiguousResult(usize),

    /// A create succeeded but the server did not say where the resource lives
    #[error("created resource has no Location header")]
    MissingLocation,

    /// A search constraint cannot be expressed on the wire
    #[error("invalid search constraint: {0}")]
    InvalidConstraint(String),
}

impl ClientError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::UnexpectedStatus { status, .. } => Some(*status),
            ClientError::ResourceAbsent(_) => Some(404),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
