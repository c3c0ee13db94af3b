//! Application layer services implementing business logic.
//!
//! # Available Services
//!
//! - [`services::shorten_service::ShortenService`] - identifier allocation and lookup

pub mod services;
