//! In-memory implementation of the mapping repository.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::domain::entities::UrlMapping;
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;

#[derive(Debug, Default)]
struct Indexes {
    by_identifier: BTreeMap<i64, String>,
    by_url: HashMap<String, i64>,
}

/// Process-local mapping store.
///
/// Both indexes sit behind a single lock so a `put` is visible in both or in
/// neither. State is lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryMappingRepository {
    indexes: RwLock<Indexes>,
}

impl InMemoryMappingRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MappingRepository for InMemoryMappingRepository {
    async fn put(&self, mapping: UrlMapping) -> Result<UrlMapping, AppError> {
        let mut indexes = self.indexes.write().await;

        if indexes.by_identifier.contains_key(&mapping.identifier) {
            return Err(AppError::conflict(format!(
                "identifier {} already allocated",
                mapping.identifier
            )));
        }
        if indexes.by_url.contains_key(&mapping.original_url) {
            return Err(AppError::conflict(format!(
                "url {} already mapped",
                mapping.original_url
            )));
        }

        indexes
            .by_identifier
            .insert(mapping.identifier, mapping.original_url.clone());
        indexes
            .by_url
            .insert(mapping.original_url.clone(), mapping.identifier);

        Ok(mapping)
    }

    async fn get_by_url(&self, url: &str) -> Result<Option<UrlMapping>, AppError> {
        let indexes = self.indexes.read().await;
        Ok(indexes
            .by_url
            .get(url)
            .map(|&identifier| UrlMapping::new(identifier, url)))
    }

    async fn get_by_identifier(&self, identifier: i64) -> Result<Option<UrlMapping>, AppError> {
        let indexes = self.indexes.read().await;
        Ok(indexes
            .by_identifier
            .get(&identifier)
            .map(|url| UrlMapping::new(identifier, url.clone())))
    }

    async fn count(&self) -> Result<i64, AppError> {
        let indexes = self.indexes.read().await;
        Ok(indexes.by_identifier.len() as i64)
    }

    async fn max_identifier(&self) -> Result<i64, AppError> {
        let indexes = self.indexes.read().await;
        Ok(indexes
            .by_identifier
            .last_key_value()
            .map(|(&identifier, _)| identifier)
            .unwrap_or(0))
    }

    async fn reset(&self) -> Result<u64, AppError> {
        let mut indexes = self.indexes.write().await;
        let removed = indexes.by_identifier.len() as u64;
        indexes.by_identifier.clear();
        indexes.by_url.clear();
        Ok(removed)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
