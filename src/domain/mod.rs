//! Domain layer containing business entities and collaborator contracts.
//!
//! Nothing in here knows about Postgres, Redis, or HTTP. Infrastructure
//! implements the traits; application services consume them.
//!
//! # Architecture
//!
//! - [`entities`] - Durable records (mappings, user accounts)
//! - [`repositories`] - Durable store contracts and their error type
//! - [`credential_gate`] - The "is this token valid" capability guarding writes

pub mod credential_gate;
pub mod entities;
pub mod repositories;
