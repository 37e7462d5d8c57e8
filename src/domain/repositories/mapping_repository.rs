//! Repository trait for short code mappings.

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::StoreError;
use async_trait::async_trait;

/// Durable store adapter for mappings.
///
/// The store is the only authority on code uniqueness. Implementations must
/// enforce it on insert and report a lost race as [`StoreError::CodeCollision`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::InMemoryMappingRepository`] - in-process map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Returns whether a mapping with this code exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the query itself failed.
    async fn exists_by_code(&self, code: &str) -> Result<bool, StoreError>;

    /// Inserts a new mapping.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CodeCollision`] if the code is already stored.
    /// Returns [`StoreError::Unavailable`] on any other failure.
    async fn insert(&self, new_mapping: NewMapping) -> Result<Mapping, StoreError>;

    /// Finds a mapping by its code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on query failure.
    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>, StoreError>;

    /// Counts stored mappings.
    async fn count(&self) -> Result<i64, StoreError>;

    /// Round-trips a trivial query. Used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
