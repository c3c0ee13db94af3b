//! Core domain entities.
//!
//! The service has a single entity, [`UrlMapping`], created exactly once per
//! distinct URL and never mutated afterwards.

pub mod mapping;

pub use mapping::UrlMapping;
