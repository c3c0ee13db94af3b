//! Repository trait definitions for the domain layer.
//!
//! Implementations live in `crate::infrastructure::persistence`:
//!
//! - `InMemoryMappingRepository` - process-local, lost on restart
//! - `PgMappingRepository` - PostgreSQL, survives restarts
//!
//! Mock implementations are auto-generated via `mockall` for unit tests.

pub mod mapping_repository;

pub use mapping_repository::MappingRepository;

#[cfg(test)]
pub use mapping_repository::MockMappingRepository;
