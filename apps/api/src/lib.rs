//! SecRest API library
//!
//! This module exposes the core API components for use in integration tests
//! and as a library.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod paging;
pub mod repositories;
pub mod routes;
pub mod search;
pub mod server;
pub mod services;

// Re-export commonly used types
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use server::{build_cors_layer, build_router, connect_repository};
