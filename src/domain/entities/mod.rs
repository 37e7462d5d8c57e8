//! Core domain entities.
//!
//! - [`Mapping`] - A short code pointing at a long URL
//! - [`User`] - An account able to obtain bearer credentials
//!
//! Creation inputs live in separate `New*` structs, mirroring the insert shape.

pub mod mapping;
pub mod user;

pub use mapping::{Mapping, NewMapping};
pub use user::{NewUser, User};
