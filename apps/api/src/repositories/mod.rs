//! Data access layer for privileges
//!
//! Handlers only see the [`PrivilegeRepository`] trait. Two backends
//! implement it: [`PgPrivilegeRepository`] on PostgreSQL and
//! [`MemoryPrivilegeRepository`] for local runs and tests.

pub mod memory;
pub mod postgres;
pub mod utils;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewPrivilege, Privilege};
use crate::paging::ListQuery;
use crate::search::SearchCriteria;

pub use memory::MemoryPrivilegeRepository;
pub use postgres::PgPrivilegeRepository;

/// Repository failures the API layer has to tell apart
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Another privilege already uses this name
    #[error("privilege name already taken: {0}")]
    DuplicateName(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage for privileges
#[async_trait]
pub trait PrivilegeRepository: Send + Sync {
    /// Find a privilege by id
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Privilege>>;

    /// Privileges matching `query`, sorted and (optionally) paged
    async fn find_all(&self, query: &ListQuery) -> RepositoryResult<Vec<Privilege>>;

    /// Number of privileges matching `criteria`
    async fn count(&self, criteria: &SearchCriteria) -> RepositoryResult<i64>;

    /// Insert a privilege and return it with its assigned id
    ///
    /// # Errors
    /// `RepositoryError::DuplicateName` if the name is already taken
    async fn create(&self, privilege: &NewPrivilege) -> RepositoryResult<Privilege>;

    /// Replace an existing privilege
    ///
    /// Returns `Ok(None)` if no privilege has that id.
    async fn update(&self, privilege: &Privilege) -> RepositoryResult<Option<Privilege>>;

    /// Delete a privilege, returning whether it existed
    async fn delete(&self, id: i64) -> RepositoryResult<bool>;

    /// Check that the backend is reachable
    async fn ping(&self) -> RepositoryResult<()>;
}
