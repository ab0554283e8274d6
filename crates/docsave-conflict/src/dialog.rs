//! Presentation adapter for the save dialog
//!
//! Any front end (terminal prompt, desktop dialog, web form) forwards its
//! user actions as [`SaveEvent`]s and redraws from [`SaveDialog::view`].
//! All decisions stay in the [`ConflictResolver`]; this layer only adds
//! the inline validation message a blank submit produces.

use serde::{Deserialize, Serialize};
use tracing::trace;

use docsave_core::domain::{Decision, DomainError, NameSnapshot, ResolutionState, SessionId};

use crate::{error::ConflictError, resolver::ConflictResolver};

/// A discrete user action in the save dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "text", rename_all = "snake_case")]
pub enum SaveEvent {
    /// The name field changed
    Edit(String),
    /// The save button was pressed
    Submit,
    /// "Overwrite" was chosen on a collision
    ConfirmOverwrite,
    /// "Back" was chosen on a collision
    CancelConfirmation,
    /// "Rename" was chosen on a collision
    AcceptSuggestion,
    /// The dialog was dismissed
    Abort,
}

/// Everything a front end needs to render the dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogView {
    pub session_id: SessionId,
    pub state: ResolutionState,
    pub candidate: String,
    /// Next free name, offered while an overwrite is pending
    pub suggestion: Option<String>,
    /// Inline validation message for the name field
    pub validation: Option<String>,
    /// Whether the save button should be enabled
    pub can_submit: bool,
}

/// Binds a [`ConflictResolver`] to an event-driven front end
#[derive(Debug, Clone)]
pub struct SaveDialog {
    resolver: ConflictResolver,
    validation: Option<String>,
}

impl SaveDialog {
    /// Opens a dialog for `current_name` against `existing`
    pub fn open(current_name: impl AsRef<str>, existing: NameSnapshot) -> Self {
        Self {
            resolver: ConflictResolver::new(current_name, existing),
            validation: None,
        }
    }

    /// Wraps an already opened resolver
    pub fn from_resolver(resolver: ConflictResolver) -> Self {
        Self {
            resolver,
            validation: None,
        }
    }

    pub fn resolver(&self) -> &ConflictResolver {
        &self.resolver
    }

    pub fn into_resolver(self) -> ConflictResolver {
        self.resolver
    }

    /// Applies one user action
    ///
    /// Returns the decision for `Submit` and `ConfirmOverwrite`, `None` for
    /// every other event.
    pub fn dispatch(&mut self, event: SaveEvent) -> Result<Option<Decision>, ConflictError> {
        trace!(
            session_id = %self.resolver.session_id(),
            state = %self.resolver.state(),
            event = ?event,
            "Dispatching save dialog event"
        );

        match event {
            SaveEvent::Edit(text) => {
                self.resolver.edit(text)?;
                self.validation = None;
                Ok(None)
            }
            SaveEvent::Submit => {
                let candidate = self.resolver.candidate().to_string();
                let decision = self.resolver.submit(candidate)?;
                self.validation = match decision {
                    Decision::Reject => Some(DomainError::EmptyName.to_string()),
                    _ => None,
                };
                Ok(Some(decision))
            }
            SaveEvent::ConfirmOverwrite => self.resolver.confirm_overwrite().map(Some),
            SaveEvent::CancelConfirmation => {
                self.resolver.cancel_confirmation()?;
                Ok(None)
            }
            SaveEvent::AcceptSuggestion => {
                self.resolver.accept_suggestion()?;
                self.validation = None;
                Ok(None)
            }
            SaveEvent::Abort => {
                self.resolver.abort();
                Ok(None)
            }
        }
    }

    /// Renders the current state
    pub fn view(&self) -> DialogView {
        let state = self.resolver.state();
        let candidate = self.resolver.candidate().to_string();

        DialogView {
            session_id: self.resolver.session_id(),
            state,
            suggestion: (state == ResolutionState::ConfirmingOverwrite)
                .then(|| self.resolver.suggest_alternative_name()),
            validation: self.validation.clone(),
            can_submit: state == ResolutionState::Editing && !candidate.is_empty(),
            candidate,
        }
    }
}

#[cfg(test)]
mod tests {
    use docsave_core::domain::DocumentName;

    use super::*;

    fn snapshot(names: &[&str]) -> NameSnapshot {
        names.iter().copied().collect()
    }

    #[test]
    fn test_blank_submit_sets_validation_until_edit() {
        let mut dialog = SaveDialog::open("", snapshot(&[]));
        assert!(!dialog.view().can_submit);

        assert_eq!(dialog.dispatch(SaveEvent::Submit).unwrap(), Some(Decision::Reject));
        let view = dialog.view();
        assert_eq!(view.state, ResolutionState::Editing);
        assert_eq!(view.validation.as_deref(), Some("Document name cannot be blank"));

        dialog.dispatch(SaveEvent::Edit("Sketch".into())).unwrap();
        let view = dialog.view();
        assert_eq!(view.validation, None);
        assert!(view.can_submit);
    }

    #[test]
    fn test_collision_view_offers_suggestion() {
        let mut dialog = SaveDialog::open("Invoice", snapshot(&["Invoice", "Invoice (1)"]));
        assert_eq!(dialog.view().suggestion, None);

        dialog.dispatch(SaveEvent::Submit).unwrap();
        let view = dialog.view();
        assert_eq!(view.state, ResolutionState::ConfirmingOverwrite);
        assert_eq!(view.suggestion.as_deref(), Some("Invoice (2)"));
        assert!(!view.can_submit);
    }

    #[test]
    fn test_rename_path_through_events() {
        let mut dialog = SaveDialog::open("Invoice", snapshot(&["Invoice", "Invoice (1)"]));

        assert_eq!(
            dialog.dispatch(SaveEvent::Submit).unwrap(),
            Some(Decision::NeedsConfirmation)
        );
        assert_eq!(dialog.dispatch(SaveEvent::AcceptSuggestion).unwrap(), None);
        assert_eq!(dialog.view().candidate, "Invoice (2)");

        assert_eq!(
            dialog.dispatch(SaveEvent::Submit).unwrap(),
            Some(Decision::Commit {
                name: DocumentName::new("Invoice (2)").unwrap(),
                overwrite: false,
            })
        );
        assert_eq!(dialog.view().state, ResolutionState::Committed);
    }

    #[test]
    fn test_overwrite_path_through_events() {
        let mut dialog = SaveDialog::open("Plan", snapshot(&["Plan"]));
        dialog.dispatch(SaveEvent::Submit).unwrap();

        let decision = dialog.dispatch(SaveEvent::ConfirmOverwrite).unwrap().unwrap();
        assert!(matches!(decision, Decision::Commit { overwrite: true, .. }));
    }

    #[test]
    fn test_back_then_edit() {
        let mut dialog = SaveDialog::open("Plan", snapshot(&["Plan"]));
        dialog.dispatch(SaveEvent::Submit).unwrap();
        dialog.dispatch(SaveEvent::CancelConfirmation).unwrap();
        dialog.dispatch(SaveEvent::Edit("Plan B".into())).unwrap();

        let decision = dialog.dispatch(SaveEvent::Submit).unwrap().unwrap();
        assert_eq!(decision.committed_name().unwrap().as_str(), "Plan B");
    }

    #[test]
    fn test_invalid_event_is_surfaced() {
        let mut dialog = SaveDialog::open("Plan", snapshot(&[]));
        let err = dialog.dispatch(SaveEvent::ConfirmOverwrite).unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_abort_is_final() {
        let mut dialog = SaveDialog::open("Plan", snapshot(&[]));
        dialog.dispatch(SaveEvent::Abort).unwrap();
        dialog.dispatch(SaveEvent::Abort).unwrap();
        assert_eq!(dialog.view().state, ResolutionState::Aborted);
        assert!(dialog.dispatch(SaveEvent::Submit).is_err());
    }

    #[test]
    fn test_events_deserialize_from_json() {
        let edit: SaveEvent =
            serde_json::from_str(r#"{"event":"edit","text":"Roadmap"}"#).unwrap();
        assert_eq!(edit, SaveEvent::Edit("Roadmap".into()));

        let submit: SaveEvent = serde_json::from_str(r#"{"event":"submit"}"#).unwrap();
        assert_eq!(submit, SaveEvent::Submit);
    }
}
