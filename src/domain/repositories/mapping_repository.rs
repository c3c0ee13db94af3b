//! Repository trait for URL mapping storage.

use crate::domain::entities::UrlMapping;
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract for URL mappings.
///
/// Every implementation must behave identically to callers: the in-memory and
/// the PostgreSQL variant are interchangeable behind `Arc<dyn MappingRepository>`.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::InMemoryMappingRepository`]
/// - [`crate::infrastructure::persistence::PgMappingRepository`]
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Stores a new mapping.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if either the identifier or the URL is
    /// already stored. Existing mappings are never overwritten.
    ///
    /// Returns [`AppError::Storage`] on backend failures.
    async fn put(&self, mapping: UrlMapping) -> Result<UrlMapping, AppError>;

    /// Finds the mapping for a URL by exact string match.
    async fn get_by_url(&self, url: &str) -> Result<Option<UrlMapping>, AppError>;

    /// Finds the mapping for an identifier.
    ///
    /// Returns `Ok(None)` for identifiers that were never allocated.
    async fn get_by_identifier(&self, identifier: i64) -> Result<Option<UrlMapping>, AppError>;

    /// Number of stored mappings.
    async fn count(&self) -> Result<i64, AppError>;

    /// Highest identifier allocated so far, `0` for an empty store.
    async fn max_identifier(&self) -> Result<i64, AppError>;

    /// Removes every mapping and returns how many were removed.
    ///
    /// Administrative operation; not exposed over HTTP.
    async fn reset(&self) -> Result<u64, AppError>;

    /// Checks whether the backend is reachable.
    async fn health_check(&self) -> bool;
}
