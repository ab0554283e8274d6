//! Domain entities and business logic
//!
//! This module contains the core domain types for docsave:
//! - Newtypes for validated names, name snapshots and session identifiers
//! - The save request, its resolution states and decisions
//! - Domain-specific error types

pub mod errors;
pub mod newtypes;
pub mod save_request;

// Re-export commonly used types
pub use errors::DomainError;
pub use newtypes::*;
pub use save_request::{Decision, ResolutionState, SaveRequest};
