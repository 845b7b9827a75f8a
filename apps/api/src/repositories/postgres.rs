//! PostgreSQL privilege storage

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::utils::{PRIVILEGE_COLUMNS, PRIVILEGE_NAME_CONSTRAINT};
use super::{PrivilegeRepository, RepositoryError, RepositoryResult};
use crate::models::{NewPrivilege, Privilege};
use crate::paging::ListQuery;
use crate::search::SearchCriteria;

/// Repository for privilege database operations
#[derive(Clone)]
pub struct PgPrivilegeRepository {
    pool: PgPool,
}

impl PgPrivilegeRepository {
    /// Create a new PgPrivilegeRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate a unique violation on the name column into a domain error
fn map_write_error(err: sqlx::Error, name: &str) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() && db_err.constraint() == Some(PRIVILEGE_NAME_CONSTRAINT) {
            return RepositoryError::DuplicateName(name.to_string());
        }
    }
    RepositoryError::Database(err)
}

#[async_trait]
impl PrivilegeRepository for PgPrivilegeRepository {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Privilege>> {
        let privilege = sqlx::query_as::<_, Privilege>(&format!(
            "SELECT {} FROM privileges WHERE id = $1",
            PRIVILEGE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(privilege)
    }

    async fn find_all(&self, query: &ListQuery) -> RepositoryResult<Vec<Privilege>> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM privileges", PRIVILEGE_COLUMNS));
        query.criteria.push_where(&mut builder);
        builder.push(query.sort.order_by_sql());

        if let Some(page) = query.page {
            builder.push(" LIMIT ");
            builder.push_bind(page.size);
            builder.push(" OFFSET ");
            builder.push_bind(page.offset());
        }

        let privileges = builder
            .build_query_as::<Privilege>()
            .fetch_all(&self.pool)
            .await?;

        Ok(privileges)
    }

    async fn count(&self, criteria: &SearchCriteria) -> RepositoryResult<i64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM privileges");
        criteria.push_where(&mut builder);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn create(&self, privilege: &NewPrivilege) -> RepositoryResult<Privilege> {
        sqlx::query_as::<_, Privilege>(&format!(
            "INSERT INTO privileges (name, description) VALUES ($1, $2) RETURNING {}",
            PRIVILEGE_COLUMNS
        ))
        .bind(&privilege.name)
        .bind(&privilege.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &privilege.name))
    }

    async fn update(&self, privilege: &Privilege) -> RepositoryResult<Option<Privilege>> {
        sqlx::query_as::<_, Privilege>(&format!(
            "UPDATE privileges SET name = $2, description = $3 WHERE id = $1 RETURNING {}",
            PRIVILEGE_COLUMNS
        ))
        .bind(privilege.id)
        .bind(&privilege.name)
        .bind(&privilege.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &privilege.name))
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM privileges WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
