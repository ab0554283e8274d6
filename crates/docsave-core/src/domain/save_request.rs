//! SaveRequest domain entity
//!
//! This module defines the per-attempt save request, the states a save
//! interaction moves through, and the decisions handed back to callers.
//!
//! ## State Machine
//!
//! ```text
//!                submit (no collision)
//!     ┌─────────┐ ──────────────────────────────────────► ┌───────────┐
//!     │ Editing │                                          │ Committed │
//!     └─────────┘ ◄──── cancel / rename ────┐              └───────────┘
//!        │    │                             │                    ▲
//!        │    │ submit (collision)   ┌─────────────────────┐     │
//!        │    └────────────────────► │ ConfirmingOverwrite │ ────┘
//!        │                           └─────────────────────┘  confirm
//!        │ abort                               │ abort
//!        ▼                                     ▼
//!     ┌─────────┐ ◄────────────────────────────┘
//!     │ Aborted │
//!     └─────────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::{DocumentName, NameSnapshot};

// ============================================================================
// ResolutionState enum
// ============================================================================

/// State of a save interaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionState {
    /// The user is editing the candidate name
    #[default]
    Editing,
    /// The candidate collided and the user must choose what to do
    ConfirmingOverwrite,
    /// A commit decision was issued; terminal
    Committed,
    /// The user cancelled the save; terminal
    Aborted,
}

impl ResolutionState {
    /// Returns true for `Committed` and `Aborted`
    pub fn is_terminal(&self) -> bool {
        matches!(self, ResolutionState::Committed | ResolutionState::Aborted)
    }

    /// Returns true if the user can still change the outcome
    pub fn is_open(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns the state name as a string
    pub fn name(&self) -> &'static str {
        match self {
            ResolutionState::Editing => "Editing",
            ResolutionState::ConfirmingOverwrite => "ConfirmingOverwrite",
            ResolutionState::Committed => "Committed",
            ResolutionState::Aborted => "Aborted",
        }
    }

    /// Checks if a state transition is valid
    ///
    /// Valid transitions:
    /// - Editing -> ConfirmingOverwrite, Committed, Aborted
    /// - ConfirmingOverwrite -> Editing, Committed, Aborted
    /// - Committed, Aborted -> (terminal, no transitions)
    pub fn can_transition_to(&self, target: ResolutionState) -> bool {
        match (self, target) {
            (ResolutionState::Editing, ResolutionState::ConfirmingOverwrite) => true,
            (ResolutionState::Editing, ResolutionState::Committed) => true,
            (ResolutionState::Editing, ResolutionState::Aborted) => true,

            (ResolutionState::ConfirmingOverwrite, ResolutionState::Editing) => true,
            (ResolutionState::ConfirmingOverwrite, ResolutionState::Committed) => true,
            (ResolutionState::ConfirmingOverwrite, ResolutionState::Aborted) => true,

            _ => false,
        }
    }

    /// Returns the target state if the transition is allowed
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if the transition is not allowed.
    pub fn transition_to(&self, target: ResolutionState) -> Result<ResolutionState, DomainError> {
        if !self.can_transition_to(target) {
            return Err(DomainError::InvalidState {
                from: self.name().to_string(),
                to: target.name().to_string(),
            });
        }
        Ok(target)
    }
}

impl fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionState::Editing => write!(f, "editing"),
            ResolutionState::ConfirmingOverwrite => write!(f, "confirming_overwrite"),
            ResolutionState::Committed => write!(f, "committed"),
            ResolutionState::Aborted => write!(f, "aborted"),
        }
    }
}

// ============================================================================
// Decision enum
// ============================================================================

/// Outcome of submitting or confirming a candidate name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    /// Proceed with persistence under `name`
    Commit {
        name: DocumentName,
        /// True when `name` was present in the snapshot
        overwrite: bool,
    },
    /// The name collides; the user must confirm, rename or abort
    NeedsConfirmation,
    /// The name was blank; keep editing
    Reject,
}

impl Decision {
    /// Returns the committed name, if this is a commit
    pub fn committed_name(&self) -> Option<&DocumentName> {
        match self {
            Decision::Commit { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns true if this is a commit
    pub fn is_commit(&self) -> bool {
        matches!(self, Decision::Commit { .. })
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Commit {
                name,
                overwrite: true,
            } => write!(f, "commit (overwrite): {}", name),
            Decision::Commit { name, .. } => write!(f, "commit: {}", name),
            Decision::NeedsConfirmation => write!(f, "needs confirmation"),
            Decision::Reject => write!(f, "reject"),
        }
    }
}

// ============================================================================
// SaveRequest struct
// ============================================================================

/// One save attempt: the editable candidate and the names it must avoid
///
/// The candidate is kept trimmed. The snapshot is fixed for the lifetime
/// of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    candidate: String,
    existing: NameSnapshot,
}

impl SaveRequest {
    /// Creates a new SaveRequest from the current name and a snapshot
    pub fn new(current_name: impl AsRef<str>, existing: NameSnapshot) -> Self {
        Self {
            candidate: current_name.as_ref().trim().to_string(),
            existing,
        }
    }

    /// Returns the trimmed candidate name
    pub fn candidate(&self) -> &str {
        &self.candidate
    }

    /// Returns the existing-name snapshot
    pub fn existing(&self) -> &NameSnapshot {
        &self.existing
    }

    /// Replaces the candidate with the trimmed form of `raw`
    pub fn set_candidate(&mut self, raw: impl AsRef<str>) {
        self.candidate = raw.as_ref().trim().to_string();
    }

    /// Returns true if the candidate is blank
    pub fn is_blank(&self) -> bool {
        self.candidate.is_empty()
    }

    /// Returns true if the candidate exactly matches a snapshot entry
    pub fn is_collision(&self) -> bool {
        !self.is_blank() && self.existing.contains(&self.candidate)
    }

    /// Validates the candidate as a committable name
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyName` when the candidate is blank.
    pub fn document_name(&self) -> Result<DocumentName, DomainError> {
        DocumentName::new(&self.candidate)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(names: &[&str]) -> NameSnapshot {
        names.iter().copied().collect()
    }

    mod state_tests {
        use super::*;

        #[test]
        fn test_default_is_editing() {
            assert_eq!(ResolutionState::default(), ResolutionState::Editing);
        }

        #[test]
        fn test_is_terminal() {
            assert!(!ResolutionState::Editing.is_terminal());
            assert!(!ResolutionState::ConfirmingOverwrite.is_terminal());
            assert!(ResolutionState::Committed.is_terminal());
            assert!(ResolutionState::Aborted.is_terminal());
        }

        #[test]
        fn test_transitions_from_editing() {
            let s = ResolutionState::Editing;
            assert!(s.can_transition_to(ResolutionState::ConfirmingOverwrite));
            assert!(s.can_transition_to(ResolutionState::Committed));
            assert!(s.can_transition_to(ResolutionState::Aborted));
            assert!(!s.can_transition_to(ResolutionState::Editing));
        }

        #[test]
        fn test_transitions_from_confirming() {
            let s = ResolutionState::ConfirmingOverwrite;
            assert!(s.can_transition_to(ResolutionState::Editing));
            assert!(s.can_transition_to(ResolutionState::Committed));
            assert!(s.can_transition_to(ResolutionState::Aborted));
            assert!(!s.can_transition_to(ResolutionState::ConfirmingOverwrite));
        }

        #[test]
        fn test_terminal_states_have_no_exits() {
            for from in [ResolutionState::Committed, ResolutionState::Aborted] {
                for to in [
                    ResolutionState::Editing,
                    ResolutionState::ConfirmingOverwrite,
                    ResolutionState::Committed,
                    ResolutionState::Aborted,
                ] {
                    assert!(!from.can_transition_to(to), "{from} -> {to}");
                }
            }
        }

        #[test]
        fn test_transition_to_error() {
            let err = ResolutionState::Committed
                .transition_to(ResolutionState::Editing)
                .unwrap_err();
            assert_eq!(
                err,
                DomainError::InvalidState {
                    from: "Committed".to_string(),
                    to: "Editing".to_string(),
                }
            );
        }

        #[test]
        fn test_display_and_serde() {
            assert_eq!(
                ResolutionState::ConfirmingOverwrite.to_string(),
                "confirming_overwrite"
            );
            let json = serde_json::to_string(&ResolutionState::Aborted).unwrap();
            assert_eq!(json, "\"aborted\"");
        }
    }

    mod decision_tests {
        use super::*;

        #[test]
        fn test_committed_name() {
            let name = DocumentName::new("Plan").unwrap();
            let decision = Decision::Commit {
                name: name.clone(),
                overwrite: false,
            };
            assert_eq!(decision.committed_name(), Some(&name));
            assert!(decision.is_commit());
            assert_eq!(Decision::Reject.committed_name(), None);
        }

        #[test]
        fn test_serializes_tagged() {
            let decision = Decision::Commit {
                name: DocumentName::new("Plan").unwrap(),
                overwrite: true,
            };
            let json = serde_json::to_value(&decision).unwrap();
            assert_eq!(
                json,
                serde_json::json!({"decision": "commit", "name": "Plan", "overwrite": true})
            );
        }
    }

    mod save_request_tests {
        use super::*;

        #[test]
        fn test_new_trims_candidate() {
            let request = SaveRequest::new("  Invoice ", NameSnapshot::new());
            assert_eq!(request.candidate(), "Invoice");
        }

        #[test]
        fn test_collision_uses_trimmed_candidate() {
            let mut request = SaveRequest::new("Draft", snapshot(&["Invoice"]));
            assert!(!request.is_collision());

            request.set_candidate(" Invoice ");
            assert!(request.is_collision());
        }

        #[test]
        fn test_blank_is_never_a_collision() {
            let request = SaveRequest::new("   ", snapshot(&[""]));
            assert!(request.is_blank());
            assert!(!request.is_collision());
            assert_eq!(request.document_name(), Err(DomainError::EmptyName));
        }
    }
}
