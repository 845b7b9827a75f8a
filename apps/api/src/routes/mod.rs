//! HTTP route handlers for the SecRest API
//!
//! - Privilege CRUD endpoints
//! - Health check and status endpoints

pub mod health;
pub mod privilege;

pub use health::{health_router, HealthState};
pub use privilege::{privilege_router, PrivilegeState, PRIVILEGES_PATH, X_TOTAL_COUNT};
