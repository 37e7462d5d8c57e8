//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`auth`] - JWT issuing, password hashing, and credential gates
//! - [`cache`] - Code cache (Redis, in-process, and no-op implementations)
//! - [`persistence`] - PostgreSQL and in-memory repositories

pub mod auth;
pub mod cache;
pub mod persistence;
