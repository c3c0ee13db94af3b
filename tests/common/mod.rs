#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use std::sync::Arc;
use url_shortener_microservice::AppError;
use url_shortener_microservice::domain::entities::UrlMapping;
use url_shortener_microservice::domain::repositories::MappingRepository;
use url_shortener_microservice::infrastructure::persistence::InMemoryMappingRepository;
use url_shortener_microservice::infrastructure::validation::SyntaxUrlValidator;
use url_shortener_microservice::routes::service_router;
use url_shortener_microservice::state::AppState;

/// Store whose every operation fails, as if the database went away.
pub struct FailingRepository;

#[async_trait]
impl MappingRepository for FailingRepository {
    async fn put(&self, _mapping: UrlMapping) -> Result<UrlMapping, AppError> {
        Err(AppError::storage("connection refused"))
    }

    async fn get_by_url(&self, _url: &str) -> Result<Option<UrlMapping>, AppError> {
        Err(AppError::storage("connection refused"))
    }

    async fn get_by_identifier(&self, _identifier: i64) -> Result<Option<UrlMapping>, AppError> {
        Err(AppError::storage("connection refused"))
    }

    async fn count(&self) -> Result<i64, AppError> {
        Err(AppError::storage("connection refused"))
    }

    async fn max_identifier(&self) -> Result<i64, AppError> {
        Err(AppError::storage("connection refused"))
    }

    async fn reset(&self) -> Result<u64, AppError> {
        Err(AppError::storage("connection refused"))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

pub fn create_test_state() -> (AppState, Arc<InMemoryMappingRepository>) {
    let repository = Arc::new(InMemoryMappingRepository::new());
    let state = AppState::new(repository.clone(), Arc::new(SyntaxUrlValidator::new()));
    (state, repository)
}

pub fn create_failing_state() -> AppState {
    AppState::new(
        Arc::new(FailingRepository),
        Arc::new(SyntaxUrlValidator::new()),
    )
}

pub fn create_test_server() -> (TestServer, Arc<InMemoryMappingRepository>) {
    let (state, repository) = create_test_state();
    let server = TestServer::new(service_router(state)).unwrap();
    (server, repository)
}
