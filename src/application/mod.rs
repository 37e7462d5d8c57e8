//! Application layer services implementing business logic.
//!
//! Services consume the domain traits (`MappingRepository`, `UserRepository`,
//! `CredentialGate`) and the cache abstraction, and return [`crate::error::AppError`]
//! for the HTTP layer to render.
//!
//! # Available Services
//!
//! - [`services::AllocationService`] - Credential check and collision-free code allocation
//! - [`services::ResolutionService`] - Cache-first code resolution with read repair
//! - [`services::AccountService`] - Registration, login, and token verification

pub mod services;
