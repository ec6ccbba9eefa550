//! Domain layer - Pure abstractions
//!
//! This layer contains NO transport details (no reqwest calls, no env lookups).
//! Only collaborator traits and domain error types.

pub mod errors;
pub mod repositories;

pub use errors::DomainError;
pub use repositories::*;
