//! In-memory repositories.
//!
//! Both repositories enforce the same uniqueness rules as the Postgres schema,
//! atomically per key, so concurrency properties can be exercised without a
//! database. They also expose an outage switch and a lookup counter, which let
//! callers observe exactly when the durable store was consulted.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::{DashMap, mapref::entry::Entry};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use crate::domain::entities::{Mapping, NewMapping, NewUser, User};
use crate::domain::repositories::{MappingRepository, StoreError, UserRepository};

/// Mapping repository backed by a sharded concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryMappingRepository {
    storage: DashMap<String, Mapping>,
    next_id: AtomicI64,
    lookups: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryMappingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates an outage: while set, every call fails with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of [`MappingRepository::find_by_code`] calls served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Stored mappings, in no particular order.
    pub fn mappings(&self) -> Vec<Mapping> {
        self.storage.iter().map(|e| e.value().clone()).collect()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MappingRepository for InMemoryMappingRepository {
    async fn exists_by_code(&self, code: &str) -> Result<bool, StoreError> {
        self.check_available()?;
        Ok(self.storage.contains_key(code))
    }

    async fn insert(&self, new_mapping: NewMapping) -> Result<Mapping, StoreError> {
        self.check_available()?;

        match self.storage.entry(new_mapping.code.clone()) {
            Entry::Occupied(_) => Err(StoreError::CodeCollision {
                code: new_mapping.code,
            }),
            Entry::Vacant(slot) => {
                let mapping = Mapping::new(
                    self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
                    new_mapping.code,
                    new_mapping.long_url,
                    new_mapping.owner,
                    Utc::now(),
                );
                slot.insert(mapping.clone());
                Ok(mapping)
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.storage.get(code).map(|e| e.value().clone()))
    }

    async fn count(&self) -> Result<i64, StoreError> {
        self.check_available()?;
        Ok(self.storage.len() as i64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}

/// User repository backed by a sharded concurrent map keyed by username.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    storage: DashMap<String, User>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.storage.get(username).map(|e| e.value().clone()))
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        match self.storage.entry(new_user.username.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate {
                constraint: Some("users_username_key".to_string()),
            }),
            Entry::Vacant(slot) => {
                let user = User {
                    id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
                    username: new_user.username,
                    password_hash: new_user.password_hash,
                    created_at: Utc::now(),
                };
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let mut users: Vec<User> = self.storage.iter().map(|e| e.value().clone()).collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }
}
