//! REST client template for the SecRest API
//!
//! This crate wraps a plain HTTP client with the conventions of the
//! SecRest server: Basic authentication, JSON bodies, `Location`-based
//! creation, `q`-encoded search constraints and paging/sorting
//! parameters.
//!
//! # Example
//!
//! ```rust,no_run
//! use secrest_client::{ClientOperation, Constraint, Privilege, PrivilegeClient, SearchField};
//! use secrest_shared_config::ClientConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PrivilegeClient::for_privileges(&ClientConfig::from_env()?)?;
//!
//! let created = client.create(&Privilege::new("READ_USERS")).await?;
//! let found = client
//!     .search_one(Constraint::new(SearchField::Name, ClientOperation::Eq, "READ_USERS"))
//!     .await?;
//! assert_eq!(found, Some(created));
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Variables
//!
//! - `API_BASE_URL`: server root (default `http://localhost:8080`)
//! - `API_USERNAME` / `API_PASSWORD`: Basic credentials

mod client;
mod error;
mod marshaller;
mod models;
mod search;

pub use client::{PrivilegeClient, RestTemplate, PRIVILEGES_PATH};
pub use error::{ClientError, ClientResult};
pub use marshaller::JsonMarshaller;
pub use models::{NameableEntity, Privilege, SortOrder};
pub use search::{encode_query, ClientOperation, Constraint, SearchField};

pub use reqwest::{Method, Response, StatusCode};
