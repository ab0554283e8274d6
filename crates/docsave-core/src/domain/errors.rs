//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! including name validation failures and invalid state transitions.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Document name is empty after trimming
    #[error("Document name cannot be blank")]
    EmptyName,

    /// Document name contains characters the store cannot represent
    #[error("Invalid document name: {0}")]
    InvalidName(String),

    /// Invalid state transition attempt
    #[error("Invalid state transition from {from} to {to}")]
    InvalidState {
        /// The current state
        from: String,
        /// The attempted target state
        to: String,
    },

    /// ID parsing error
    #[error("Invalid ID format: {0}")]
    InvalidId(String),
}
