//! PostgreSQL implementation of the mapping repository.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::UrlMapping;
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;

#[derive(Debug, FromRow)]
struct MappingRow {
    short_url: i64,
    original_url: String,
}

impl From<MappingRow> for UrlMapping {
    fn from(row: MappingRow) -> Self {
        UrlMapping::new(row.short_url, row.original_url)
    }
}

/// PostgreSQL repository for URL mappings.
///
/// Backed by the `url_mappings` table. The primary key on `short_url` and the
/// unique constraint on `original_url` reject conflicting writers even when
/// several service instances share one database.
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
    async fn put(&self, mapping: UrlMapping) -> Result<UrlMapping, AppError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            INSERT INTO url_mappings (short_url, original_url)
            VALUES ($1, $2)
            RETURNING short_url, original_url
            "#,
        )
        .bind(mapping.identifier)
        .bind(&mapping.original_url)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn get_by_url(&self, url: &str) -> Result<Option<UrlMapping>, AppError> {
        let row = sqlx::query_as::<_, MappingRow>(
            "SELECT short_url, original_url FROM url_mappings WHERE original_url = $1",
        )
        .bind(url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn get_by_identifier(&self, identifier: i64) -> Result<Option<UrlMapping>, AppError> {
        let row = sqlx::query_as::<_, MappingRow>(
            "SELECT short_url, original_url FROM url_mappings WHERE short_url = $1",
        )
        .bind(identifier)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM url_mappings")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn max_identifier(&self) -> Result<i64, AppError> {
        let max: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(short_url), 0) FROM url_mappings")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(max)
    }

    async fn reset(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM url_mappings")
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
