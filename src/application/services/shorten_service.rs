//! Identifier allocation and lookup service.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_retry::RetryIf;
use tokio_retry::strategy::ExponentialBackoff;
use tracing::{debug, info, warn};

use crate::domain::entities::UrlMapping;
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::infrastructure::validation::UrlValidator;

/// Allocation attempts (first try included) before a conflicting write is fatal.
const MAX_ALLOCATION_ATTEMPTS: usize = 5;

/// Service that maps URLs to sequential identifiers and resolves them back.
///
/// # Allocation
///
/// A URL seen before gets its existing identifier back. A new URL gets
/// `highest identifier + 1` (starting at 1). The read-allocate-write sequence
/// runs under an in-process lock, so concurrent first-time submissions of the
/// same URL all observe one identifier.
///
/// When several processes share a durable store the lock is not enough; the
/// store then rejects the losing write with [`AppError::Conflict`] and the
/// allocation is retried with a short backoff, returning the winner's mapping
/// if the URL was the contested key.
pub struct ShortenService {
    repository: Arc<dyn MappingRepository>,
    validator: Arc<dyn UrlValidator>,
    allocation_lock: Mutex<()>,
}

impl ShortenService {
    /// Creates a new shorten service.
    pub fn new(repository: Arc<dyn MappingRepository>, validator: Arc<dyn UrlValidator>) -> Self {
        Self {
            repository,
            validator,
            allocation_lock: Mutex::new(()),
        }
    }

    /// Validates a submitted URL and resolves it to a mapping.
    ///
    /// Surrounding whitespace is trimmed; the URL is otherwise stored as given.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] if validation fails.
    /// Returns [`AppError::Storage`] on store failures.
    pub async fn shorten(&self, raw_url: &str) -> Result<UrlMapping, AppError> {
        let url = raw_url.trim();
        self.validator.validate(url).await?;
        self.resolve(url).await
    }

    /// Returns the mapping for `url`, allocating a new identifier on first sight.
    ///
    /// `url` must already be validated; no checks are performed here.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on store failures, or when conflicting
    /// writers keep winning past the retry budget.
    pub async fn resolve(&self, url: &str) -> Result<UrlMapping, AppError> {
        if let Some(existing) = self.repository.get_by_url(url).await? {
            debug!("Resolved existing mapping {} -> {}", url, existing.identifier);
            return Ok(existing);
        }

        let _guard = self.allocation_lock.lock().await;

        let strategy = ExponentialBackoff::from_millis(5)
            .max_delay(Duration::from_millis(200))
            .take(MAX_ALLOCATION_ATTEMPTS - 1);

        RetryIf::spawn(
            strategy,
            || self.try_allocate(url),
            |e: &AppError| {
                let retry = matches!(e, AppError::Conflict(_));
                if retry {
                    warn!("Allocation conflict for {}: {}. Retrying", url, e);
                }
                retry
            },
        )
        .await
        .map_err(|e| match e {
            AppError::Conflict(message) => AppError::storage(format!(
                "identifier allocation for {url} kept conflicting: {message}"
            )),
            other => other,
        })
    }

    /// One allocation attempt; expects the allocation lock to be held.
    async fn try_allocate(&self, url: &str) -> Result<UrlMapping, AppError> {
        if let Some(existing) = self.repository.get_by_url(url).await? {
            return Ok(existing);
        }

        let identifier = self.repository.max_identifier().await? + 1;
        let mapping = self
            .repository
            .put(UrlMapping::new(identifier, url))
            .await?;

        info!("Allocated short URL {} for {}", mapping.identifier, url);
        Ok(mapping)
    }

    /// Retrieves the mapping for an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the identifier was never allocated.
    pub async fn lookup(&self, identifier: i64) -> Result<UrlMapping, AppError> {
        self.repository
            .get_by_identifier(identifier)
            .await?
            .ok_or_else(|| AppError::not_found(identifier.to_string()))
    }

    /// Retrieves the mapping for a raw path segment.
    ///
    /// Only the canonical decimal form of a positive identifier matches:
    /// `1` resolves, while `01`, `+1` and ` 1` are reported as
    /// [`AppError::NotFound`] like any other unknown segment.
    pub async fn lookup_raw(&self, segment: &str) -> Result<UrlMapping, AppError> {
        match parse_canonical_identifier(segment) {
            Some(identifier) => self.lookup(identifier).await,
            None => Err(AppError::not_found(segment)),
        }
    }

    /// Number of stored mappings.
    pub async fn count(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    /// Highest identifier allocated so far.
    pub async fn max_identifier(&self) -> Result<i64, AppError> {
        self.repository.max_identifier().await
    }

    /// Checks whether the mapping store is reachable.
    pub async fn health_check(&self) -> bool {
        self.repository.health_check().await
    }
}

/// Parses `segment` as an identifier only when it is written exactly as one
/// would be allocated: ASCII digits, no sign, no leading zero, greater than 0.
fn parse_canonical_identifier(segment: &str) -> Option<i64> {
    if segment.is_empty()
        || segment.starts_with('0')
        || !segment.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    segment.parse::<i64>().ok().filter(|&identifier| identifier > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockMappingRepository;
    use crate::infrastructure::persistence::InMemoryMappingRepository;
    use crate::infrastructure::validation::{MockUrlValidator, SyntaxUrlValidator};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn memory_service() -> ShortenService {
        ShortenService::new(
            Arc::new(InMemoryMappingRepository::new()),
            Arc::new(SyntaxUrlValidator::new()),
        )
    }

    #[tokio::test]
    async fn test_resolve_scenario() {
        let service = memory_service();

        let com = service.resolve("https://example.com").await.unwrap();
        let org = service.resolve("https://example.org").await.unwrap();
        let com_again = service.resolve("https://example.com").await.unwrap();

        assert_eq!(com.identifier, 1);
        assert_eq!(org.identifier, 2);
        assert_eq!(com_again.identifier, 1);

        assert_eq!(
            service.lookup(2).await.unwrap().original_url,
            "https://example.org"
        );
        assert!(matches!(
            service.lookup(99).await,
            Err(AppError::NotFound { .. })
        ));
        assert_eq!(service.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_identifiers_are_strictly_increasing() {
        let service = memory_service();

        let mut previous = 0;
        for n in 0..20 {
            let mapping = service
                .resolve(&format!("https://example.com/{n}"))
                .await
                .unwrap();
            assert_eq!(mapping.identifier, previous + 1);
            previous = mapping.identifier;
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_submissions_share_identifier() {
        let repository = Arc::new(InMemoryMappingRepository::new());
        let service = Arc::new(ShortenService::new(
            repository.clone(),
            Arc::new(SyntaxUrlValidator::new()),
        ));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.resolve("https://same.example").await })
            })
            .collect();

        let mut identifiers = Vec::new();
        for handle in handles {
            identifiers.push(handle.await.unwrap().unwrap().identifier);
        }

        assert!(identifiers.iter().all(|&id| id == identifiers[0]));
        assert_eq!(repository.count().await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_distinct_urls_get_distinct_identifiers() {
        let service = Arc::new(memory_service());

        let handles: Vec<_> = (0..16)
            .map(|n| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .resolve(&format!("https://example.com/{n}"))
                        .await
                })
            })
            .collect();

        let mut identifiers = Vec::new();
        for handle in handles {
            identifiers.push(handle.await.unwrap().unwrap().identifier);
        }
        identifiers.sort_unstable();

        assert_eq!(identifiers, (1..=16).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn test_shorten_trims_and_validates() {
        let service = memory_service();

        let mapping = service.shorten("  https://example.com/a  ").await.unwrap();
        assert_eq!(mapping.original_url, "https://example.com/a");

        let err = service.shorten("ftp:/john-doe.org").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidUrl { .. }));
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_shorten_rejected_url_never_touches_store() {
        let mut mock_validator = MockUrlValidator::new();
        mock_validator
            .expect_validate()
            .times(1)
            .returning(|_| Err(AppError::invalid_url("does not resolve")));

        let mut mock_repo = MockMappingRepository::new();
        mock_repo.expect_get_by_url().times(0);
        mock_repo.expect_put().times(0);

        let service = ShortenService::new(Arc::new(mock_repo), Arc::new(mock_validator));

        let result = service.shorten("https://nowhere.example").await;
        assert!(matches!(result, Err(AppError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_resolve_hit_does_not_allocate() {
        let mut mock_repo = MockMappingRepository::new();
        mock_repo
            .expect_get_by_url()
            .times(1)
            .returning(|url| Ok(Some(UrlMapping::new(5, url))));
        mock_repo.expect_max_identifier().times(0);
        mock_repo.expect_put().times(0);

        let service = ShortenService::new(Arc::new(mock_repo), Arc::new(SyntaxUrlValidator));

        let mapping = service.resolve("https://example.com").await.unwrap();
        assert_eq!(mapping.identifier, 5);
    }

    #[tokio::test]
    async fn test_resolve_allocates_after_highest_identifier() {
        let mut mock_repo = MockMappingRepository::new();
        mock_repo.expect_get_by_url().returning(|_| Ok(None));
        mock_repo.expect_max_identifier().times(1).returning(|| Ok(41));
        mock_repo
            .expect_put()
            .withf(|mapping| mapping.identifier == 42)
            .times(1)
            .returning(Ok);

        let service = ShortenService::new(Arc::new(mock_repo), Arc::new(SyntaxUrlValidator));

        let mapping = service.resolve("https://example.com").await.unwrap();
        assert_eq!(mapping.identifier, 42);
    }

    #[tokio::test]
    async fn test_resolve_returns_winner_after_url_conflict() {
        let lookups = Arc::new(AtomicUsize::new(0));
        let counter = lookups.clone();

        let mut mock_repo = MockMappingRepository::new();
        mock_repo.expect_get_by_url().returning(move |url| {
            // fast path and first attempt miss; the other writer has committed by the retry
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Ok(None)
            } else {
                Ok(Some(UrlMapping::new(7, url)))
            }
        });
        mock_repo.expect_max_identifier().times(1).returning(|| Ok(6));
        mock_repo
            .expect_put()
            .times(1)
            .returning(|_| Err(AppError::conflict("url_mappings_original_url_key")));

        let service = ShortenService::new(Arc::new(mock_repo), Arc::new(SyntaxUrlValidator));

        let mapping = service.resolve("https://example.com").await.unwrap();
        assert_eq!(mapping.identifier, 7);
        assert_eq!(lookups.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_resolve_retries_with_fresh_identifier_after_id_conflict() {
        let max_calls = Arc::new(AtomicUsize::new(0));
        let counter = max_calls.clone();

        let mut mock_repo = MockMappingRepository::new();
        mock_repo.expect_get_by_url().returning(|_| Ok(None));
        mock_repo
            .expect_max_identifier()
            .times(2)
            .returning(move || Ok(if counter.fetch_add(1, Ordering::SeqCst) == 0 { 1 } else { 2 }));
        mock_repo
            .expect_put()
            .withf(|mapping| mapping.identifier == 2)
            .times(1)
            .returning(|_| Err(AppError::conflict("url_mappings_pkey")));
        mock_repo
            .expect_put()
            .withf(|mapping| mapping.identifier == 3)
            .times(1)
            .returning(Ok);

        let service = ShortenService::new(Arc::new(mock_repo), Arc::new(SyntaxUrlValidator));

        let mapping = service.resolve("https://example.com").await.unwrap();
        assert_eq!(mapping.identifier, 3);
    }

    #[tokio::test]
    async fn test_resolve_gives_up_after_persistent_conflicts() {
        let mut mock_repo = MockMappingRepository::new();
        mock_repo.expect_get_by_url().returning(|_| Ok(None));
        mock_repo.expect_max_identifier().returning(|| Ok(0));
        mock_repo
            .expect_put()
            .times(MAX_ALLOCATION_ATTEMPTS)
            .returning(|_| Err(AppError::conflict("url_mappings_pkey")));

        let service = ShortenService::new(Arc::new(mock_repo), Arc::new(SyntaxUrlValidator));

        let result = service.resolve("https://example.com").await;
        assert!(matches!(result, Err(AppError::Storage(_))));
    }

    #[tokio::test]
    async fn test_storage_errors_propagate_without_retry() {
        let mut mock_repo = MockMappingRepository::new();
        mock_repo
            .expect_get_by_url()
            .times(1)
            .returning(|_| Err(AppError::storage("connection refused")));

        let service = ShortenService::new(Arc::new(mock_repo), Arc::new(SyntaxUrlValidator));

        let result = service.resolve("https://example.com").await;
        assert!(matches!(result, Err(AppError::Storage(_))));
    }

    #[tokio::test]
    async fn test_lookup_raw_rejects_non_identifiers() {
        let service = memory_service();
        service.resolve("https://example.com").await.unwrap();

        assert_eq!(
            service.lookup_raw("1").await.unwrap().original_url,
            "https://example.com"
        );
        for segment in [
            "0",
            "-1",
            "abc",
            "1.5",
            "",
            "99999999999999999999",
            "01",
            "+1",
            " 1",
            "1 ",
        ] {
            assert!(
                matches!(
                    service.lookup_raw(segment).await,
                    Err(AppError::NotFound { .. })
                ),
                "segment {segment:?} should not resolve"
            );
        }
    }
}
