//! Domain layer containing the business entity and the storage contract.
//!
//! # Architecture
//!
//! - [`entities`] - The [`entities::UrlMapping`] data structure
//! - [`repositories`] - The Mapping Store trait implemented by infrastructure
//!
//! The domain layer has no dependency on HTTP or on a particular datastore;
//! identifier allocation lives in [`crate::application::services`].

pub mod entities;
pub mod repositories;
