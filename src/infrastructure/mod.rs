//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`persistence`] - Mapping store implementations (in-memory and PostgreSQL)
//! - [`validation`] - URL validators (syntax and DNS)

pub mod persistence;
pub mod validation;
