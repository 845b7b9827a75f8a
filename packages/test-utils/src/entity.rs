//! Building and mutating resources for test scenarios

use secrest_client::Privilege;

use crate::random::random_alphabetic;

const NAME_LEN: usize = 8;

/// Resource-specific fixture construction
pub trait EntityOperations<T>: Send + Sync {
    /// A fresh resource, valid and not yet persisted (no id)
    fn create_new_entity(&self) -> T;

    /// Make `entity` fail server-side validation
    fn invalidate(&self, entity: &mut T);

    /// Change some attribute of `entity` so an update is observable
    fn change(&self, entity: &mut T);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PrivilegeEntityOps;

impl EntityOperations<Privilege> for PrivilegeEntityOps {
    fn create_new_entity(&self) -> Privilege {
        Privilege::new(random_alphabetic(NAME_LEN))
    }

    fn invalidate(&self, entity: &mut Privilege) {
        entity.name = String::new();
    }

    fn change(&self, entity: &mut Privilege) {
        entity.name = random_alphabetic(NAME_LEN);
    }
}
