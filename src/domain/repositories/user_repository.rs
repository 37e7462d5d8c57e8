//! Repository trait for user accounts.

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::StoreError;
use async_trait::async_trait;

/// Account storage used by the credential service.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::InMemoryUserRepository`] - in-process map
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds an account by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if the username is taken.
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Lists all accounts, newest first.
    async fn list(&self) -> Result<Vec<User>, StoreError>;
}
