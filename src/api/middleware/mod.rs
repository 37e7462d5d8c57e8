//! HTTP middleware layers applied to the whole router.

pub mod cors;
pub mod tracing;
