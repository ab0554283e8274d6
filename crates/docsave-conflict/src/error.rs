//! Error types for the conflict engine

use thiserror::Error;

use docsave_core::domain::{DomainError, ResolutionState};

/// Errors that can occur during save-name resolution
#[derive(Debug, Error)]
pub enum ConflictError {
    /// An operation was called in a state that does not permit it
    #[error("cannot {operation} while {state}")]
    InvalidState {
        state: ResolutionState,
        operation: &'static str,
    },

    /// A non-commit decision was handed to the persistence step
    #[error("decision is not a commit: {0}")]
    NotCommitted(String),

    /// The name collides and no one is available to confirm
    #[error("'{0}' already exists and the conflict policy requires confirmation")]
    ConfirmationRequired(String),

    /// The store gained a document with this name after the snapshot was taken
    #[error("'{0}' was created after the save dialog opened")]
    StaleSnapshot(String),

    /// Unknown conflict policy name
    #[error("invalid conflict policy '{0}'; valid: prompt, overwrite, rename, abort")]
    InvalidPolicy(String),

    /// Domain validation error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Storage error
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl ConflictError {
    /// Returns true for caller-contract violations that indicate a bug
    /// in the integrating code rather than a user-facing condition
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            ConflictError::InvalidState { .. } | ConflictError::NotCommitted(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_display() {
        let err = ConflictError::InvalidState {
            state: ResolutionState::Committed,
            operation: "submit",
        };
        assert_eq!(err.to_string(), "cannot submit while committed");
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_stale_snapshot_is_not_contract_violation() {
        let err = ConflictError::StaleSnapshot("Invoice".to_string());
        assert!(!err.is_contract_violation());
        assert!(err.to_string().contains("Invoice"));
    }
}
