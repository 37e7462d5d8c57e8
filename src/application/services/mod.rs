//! Business logic services for the application layer.

pub mod account_service;
pub mod allocation_service;
pub mod resolution_service;

pub use account_service::AccountService;
pub use allocation_service::{Allocation, AllocationPolicy, AllocationService, CacheWrite};
pub use resolution_service::{Resolution, ResolutionService, ResolutionSource};
