//! Client template plus entity operations for one resource

use reqwest::{Method, RequestBuilder};
use secrest_client::{NameableEntity, PrivilegeClient, RestTemplate};

use crate::entity::{EntityOperations, PrivilegeEntityOps};

/// Everything a scenario needs to exercise one resource
#[derive(Debug, Clone)]
pub struct RestFixture<T, O> {
    api: RestTemplate<T>,
    entity_ops: O,
}

/// Fixture for `/api/privileges`
pub type PrivilegeFixture = RestFixture<secrest_client::Privilege, PrivilegeEntityOps>;

impl PrivilegeFixture {
    pub fn for_privileges(api: PrivilegeClient) -> Self {
        Self::new(api, PrivilegeEntityOps)
    }
}

impl<T, O> RestFixture<T, O>
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    pub fn new(api: RestTemplate<T>, entity_ops: O) -> Self {
        Self { api, entity_ops }
    }

    pub fn api(&self) -> &RestTemplate<T> {
        &self.api
    }

    pub fn entity_ops(&self) -> &O {
        &self.entity_ops
    }

    pub fn create_new_entity(&self) -> T {
        self.entity_ops.create_new_entity()
    }

    /// Collection URI with a trailing `/`, ready for an id to be appended
    pub fn uri(&self) -> String {
        format!("{}/", self.api.uri())
    }

    /// Authenticated request against the collection URI
    ///
    /// # Panics
    /// If the collection URI does not parse, which means the fixture was
    /// built with a broken base URL.
    pub fn given_authenticated(&self, method: Method) -> RequestBuilder {
        self.api
            .given_authenticated(method, &self.api.uri(), None)
            .expect("collection URI must resolve")
    }
}
