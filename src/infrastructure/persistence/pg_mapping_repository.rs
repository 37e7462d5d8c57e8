//! PostgreSQL implementation of the mapping repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::{MappingRepository, StoreError};
use crate::utils::db_error::is_unique_violation_on_code;

#[derive(sqlx::FromRow)]
struct MappingRow {
    id: i64,
    code: String,
    long_url: String,
    owner: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<MappingRow> for Mapping {
    fn from(r: MappingRow) -> Self {
        Mapping::new(r.id, r.code, r.long_url, r.owner, r.created_at)
    }
}

/// PostgreSQL repository for mappings.
///
/// Uniqueness is enforced by the `mappings_code_key` constraint; a violation on
/// insert is reported as [`StoreError::CodeCollision`].
pub struct PgMappingRepository {
    pool: Arc<PgPool>,
}

impl PgMappingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    async fn exists_by_code(&self, code: &str) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM mappings WHERE code = $1)")
                .bind(code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn insert(&self, new_mapping: NewMapping) -> Result<Mapping, StoreError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            INSERT INTO mappings (code, long_url, owner)
            VALUES ($1, $2, $3)
            RETURNING id, code, long_url, owner, created_at
            "#,
        )
        .bind(&new_mapping.code)
        .bind(&new_mapping.long_url)
        .bind(&new_mapping.owner)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation_on_code(&e) {
                StoreError::CodeCollision {
                    code: new_mapping.code.clone(),
                }
            } else {
                StoreError::from(e)
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>, StoreError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT id, code, long_url, owner, created_at
            FROM mappings
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Mapping::from))
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mappings")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
