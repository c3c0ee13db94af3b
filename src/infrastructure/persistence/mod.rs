//! Mapping store implementations.
//!
//! # Repositories
//!
//! - [`InMemoryMappingRepository`] - `HashMap`/`BTreeMap` behind one lock
//! - [`PgMappingRepository`] - PostgreSQL via SQLx

pub mod memory_mapping_repository;
pub mod pg_mapping_repository;

pub use memory_mapping_repository::InMemoryMappingRepository;
pub use pg_mapping_repository::PgMappingRepository;
