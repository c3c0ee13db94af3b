//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::ShortenService;
use crate::domain::repositories::MappingRepository;
use crate::infrastructure::validation::UrlValidator;

#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<ShortenService>,
}

impl AppState {
    /// Wires the shorten service over the given store and validator.
    pub fn new(repository: Arc<dyn MappingRepository>, validator: Arc<dyn UrlValidator>) -> Self {
        Self {
            shorten_service: Arc::new(ShortenService::new(repository, validator)),
        }
    }
}
