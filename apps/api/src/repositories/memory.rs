//! In-process privilege storage
//!
//! Keeps privileges in a `BTreeMap` behind a tokio `RwLock`. Search and
//! ordering reuse [`SearchCriteria::matches`] and [`Sort::compare`] so
//! results line up with the PostgreSQL backend.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{PrivilegeRepository, RepositoryError, RepositoryResult};
use crate::models::{NewPrivilege, Privilege};
use crate::paging::ListQuery;
use crate::search::SearchCriteria;

#[derive(Debug)]
pub struct MemoryPrivilegeRepository {
    privileges: RwLock<BTreeMap<i64, Privilege>>,
    next_id: AtomicI64,
}

impl MemoryPrivilegeRepository {
    pub fn new() -> Self {
        Self {
            privileges: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryPrivilegeRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn name_taken(privileges: &BTreeMap<i64, Privilege>, name: &str, except: Option<i64>) -> bool {
    privileges
        .values()
        .any(|p| p.name == name && Some(p.id) != except)
}

#[async_trait]
impl PrivilegeRepository for MemoryPrivilegeRepository {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Privilege>> {
        Ok(self.privileges.read().await.get(&id).cloned())
    }

    async fn find_all(&self, query: &ListQuery) -> RepositoryResult<Vec<Privilege>> {
        let privileges = self.privileges.read().await;

        let mut matching: Vec<Privilege> = privileges
            .values()
            .filter(|p| query.criteria.matches(p))
            .cloned()
            .collect();
        matching.sort_by(|a, b| query.sort.compare(a, b));

        let Some(page) = query.page else {
            return Ok(matching);
        };

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(page.size).unwrap_or(0);
        Ok(matching.into_iter().skip(offset).take(size).collect())
    }

    async fn count(&self, criteria: &SearchCriteria) -> RepositoryResult<i64> {
        let privileges = self.privileges.read().await;
        let count = privileges.values().filter(|p| criteria.matches(p)).count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn create(&self, privilege: &NewPrivilege) -> RepositoryResult<Privilege> {
        let mut privileges = self.privileges.write().await;

        if name_taken(&privileges, &privilege.name, None) {
            return Err(RepositoryError::DuplicateName(privilege.name.clone()));
        }

        let created = Privilege {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: privilege.name.clone(),
            description: privilege.description.clone(),
        };
        privileges.insert(created.id, created.clone());

        Ok(created)
    }

    async fn update(&self, privilege: &Privilege) -> RepositoryResult<Option<Privilege>> {
        let mut privileges = self.privileges.write().await;

        if !privileges.contains_key(&privilege.id) {
            return Ok(None);
        }
        if name_taken(&privileges, &privilege.name, Some(privilege.id)) {
            return Err(RepositoryError::DuplicateName(privilege.name.clone()));
        }

        privileges.insert(privilege.id, privilege.clone());
        Ok(Some(privilege.clone()))
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.privileges.write().await.remove(&id).is_some())
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paging::{PageRequest, Sort, SortField, SortOrder};
    use assert_matches::assert_matches;

    fn new_privilege(name: &str, description: Option<&str>) -> NewPrivilege {
        NewPrivilege {
            name: name.to_string(),
            description: description.map(str::to_string),
        }
    }

    async fn seeded(names: &[&str]) -> MemoryPrivilegeRepository {
        let repo = MemoryPrivilegeRepository::new();
        for name in names {
            repo.create(&new_privilege(name, None)).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let repo = MemoryPrivilegeRepository::new();
        let a = repo.create(&new_privilege("A", None)).await.unwrap();
        let b = repo.create(&new_privilege("B", Some("bee"))).await.unwrap();
        assert!(b.id > a.id);
        assert_eq!(repo.find_by_id(b.id).await.unwrap(), Some(b));
    }

    #[tokio::test]
    async fn test_create_duplicate_name_rejected() {
        let repo = seeded(&["READ"]).await;
        assert_matches!(
            repo.create(&new_privilege("READ", None)).await,
            Err(RepositoryError::DuplicateName(name)) if name == "READ"
        );
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let repo = MemoryPrivilegeRepository::new();
        let ghost = Privilege {
            id: 99,
            name: "GHOST".to_string(),
            description: None,
        };
        assert_eq!(repo.update(&ghost).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_keeps_own_name_but_rejects_others() {
        let repo = seeded(&["A", "B"]).await;
        let mut a = repo.find_by_id(1).await.unwrap().unwrap();

        a.description = Some("changed".to_string());
        assert_eq!(repo.update(&a).await.unwrap(), Some(a.clone()));

        a.name = "B".to_string();
        assert_matches!(
            repo.update(&a).await,
            Err(RepositoryError::DuplicateName(_))
        );
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let repo = seeded(&["A"]).await;
        assert!(repo.delete(1).await.unwrap());
        assert!(!repo.delete(1).await.unwrap());
        assert_eq!(repo.find_by_id(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_all_sorted_and_paged() {
        let repo = seeded(&["c", "a", "d", "b"]).await;
        let query = ListQuery {
            sort: Sort {
                field: SortField::Name,
                order: SortOrder::Asc,
            },
            page: Some(PageRequest { page: 1, size: 2 }),
            ..ListQuery::default()
        };

        let names: Vec<_> = repo
            .find_all(&query)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["c", "d"]);
    }

    #[tokio::test]
    async fn test_find_all_and_count_apply_search() {
        let repo = seeded(&["READ_A", "READ_B", "WRITE_A"]).await;
        let criteria = SearchCriteria::parse("name:READ*").unwrap();
        let query = ListQuery {
            criteria: criteria.clone(),
            ..ListQuery::default()
        };

        assert_eq!(repo.find_all(&query).await.unwrap().len(), 2);
        assert_eq!(repo.count(&criteria).await.unwrap(), 2);
        assert_eq!(repo.count(&SearchCriteria::default()).await.unwrap(), 3);
    }
}
