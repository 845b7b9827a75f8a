//! Shared integration test suites for SecRest REST resources
//!
//! A resource is tested by pairing its client template with an
//! [`EntityOperations`] implementation in a [`RestFixture`] and handing
//! an async constructor for that fixture to the suite macros:
//!
//! - [`logic_rest_integration_tests!`] - find, search, create, update, delete
//! - [`sort_and_pagination_rest_integration_tests!`] - paging and sorting
//!
//! # Example
//!
//! ```rust,ignore
//! async fn privilege_fixture() -> PrivilegeFixture {
//!     let server = spawn_server().await;
//!     PrivilegeFixture::for_privileges(server.client())
//! }
//!
//! mod logic {
//!     secrest_test_utils::logic_rest_integration_tests!(super::privilege_fixture());
//! }
//! ```

mod entity;
mod fixture;
pub mod logic;
mod random;
pub mod sort_and_pagination;

pub use entity::{EntityOperations, PrivilegeEntityOps};
pub use fixture::{PrivilegeFixture, RestFixture};
pub use random::{random_alphabetic, random_negative_id, random_numeric, random_positive_id};
