//! Durable store contracts.
//!
//! Traits describe what the application layer needs from the store of record;
//! implementations live in `crate::infrastructure::persistence`. Mock
//! implementations are generated via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`MappingRepository`] - Short code mappings
//! - [`UserRepository`] - Accounts for the credential service

pub mod error;
pub mod mapping_repository;
pub mod user_repository;

pub use error::StoreError;
pub use mapping_repository::MappingRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use mapping_repository::MockMappingRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
