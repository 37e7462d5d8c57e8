//! Durable store implementations.
//!
//! # Repositories
//!
//! - [`PgMappingRepository`] / [`PgUserRepository`] - PostgreSQL via SQLx
//! - [`InMemoryMappingRepository`] / [`InMemoryUserRepository`] - concurrent maps
//!   with the same uniqueness guarantees, for tests and local runs

pub mod memory;
pub mod pg_mapping_repository;
pub mod pg_user_repository;

pub use memory::{InMemoryMappingRepository, InMemoryUserRepository};
pub use pg_mapping_repository::PgMappingRepository;
pub use pg_user_repository::PgUserRepository;
