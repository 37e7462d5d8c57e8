//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Short code generation and shape checks
//! - [`db_error`] - Postgres error classification
//! - [`bearer`] - Authorization header parsing

pub mod bearer;
pub mod code_generator;
pub mod db_error;
