//! Save-name conflict resolver
//!
//! Drives one save interaction from the first proposed name to a final
//! decision:
//! - `submit`: commit a free name, ask for confirmation on a collision,
//!   reject a blank name
//! - `confirm_overwrite`: commit over the existing document
//! - `cancel_confirmation` / `accept_suggestion`: go back to editing
//! - `abort`: give up without committing
//!
//! The resolver performs no I/O. Persisting a committed name is the
//! caller's job.

use tracing::{debug, info, trace};

use docsave_core::domain::{
    Decision, DocumentName, NameSnapshot, ResolutionState, SaveRequest, SessionId,
};

use crate::{error::ConflictError, namer::ConflictNamer};

/// State machine for one save interaction
///
/// Calls that a state does not permit return [`ConflictError::InvalidState`]
/// and leave the resolver untouched. Once `Committed` or `Aborted`, only
/// [`ConflictResolver::abort`] is accepted, as a no-op.
#[derive(Debug, Clone)]
pub struct ConflictResolver {
    session_id: SessionId,
    request: SaveRequest,
    state: ResolutionState,
}

impl ConflictResolver {
    /// Opens a session in `Editing` with `current_name` as the candidate
    pub fn new(current_name: impl AsRef<str>, existing: NameSnapshot) -> Self {
        let request = SaveRequest::new(current_name, existing);
        let session_id = SessionId::new();

        debug!(
            session_id = %session_id,
            candidate = %request.candidate(),
            existing = request.existing().len(),
            "Save session opened"
        );

        Self {
            session_id,
            request,
            state: ResolutionState::Editing,
        }
    }

    /// Returns the session identifier
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Returns the current state
    pub fn state(&self) -> ResolutionState {
        self.state
    }

    /// Returns the trimmed candidate name
    pub fn candidate(&self) -> &str {
        self.request.candidate()
    }

    /// Returns the existing-name snapshot taken when the session opened
    pub fn snapshot(&self) -> &NameSnapshot {
        self.request.existing()
    }

    /// Returns true once the session reached `Committed` or `Aborted`
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// Replaces the candidate while editing
    pub fn edit(&mut self, text: impl AsRef<str>) -> Result<(), ConflictError> {
        self.require(&[ResolutionState::Editing], "edit")?;
        self.request.set_candidate(text);
        trace!(session_id = %self.session_id, candidate = %self.candidate(), "Candidate edited");
        Ok(())
    }

    /// Submits `candidate` for saving
    ///
    /// Returns `Reject` for a blank name and stays in `Editing`.
    /// Returns `Commit` for a name absent from the snapshot and moves to
    /// `Committed`. Returns `NeedsConfirmation` for a colliding name and
    /// moves to `ConfirmingOverwrite`.
    pub fn submit(&mut self, candidate: impl AsRef<str>) -> Result<Decision, ConflictError> {
        self.require(&[ResolutionState::Editing], "submit")?;
        self.request.set_candidate(candidate);

        let name = match self.request.document_name() {
            Ok(name) => name,
            Err(_) => {
                debug!(session_id = %self.session_id, "Rejected blank name");
                return Ok(Decision::Reject);
            }
        };

        if self.request.is_collision() {
            self.transition(ResolutionState::ConfirmingOverwrite)?;
            info!(
                session_id = %self.session_id,
                candidate = %name,
                "Name already exists, confirmation required"
            );
            return Ok(Decision::NeedsConfirmation);
        }

        self.commit(name, false)
    }

    /// Confirms overwriting the existing document with the candidate name
    pub fn confirm_overwrite(&mut self) -> Result<Decision, ConflictError> {
        self.require(&[ResolutionState::ConfirmingOverwrite], "confirm overwrite")?;
        let name = self.request.document_name()?;
        self.commit(name, true)
    }

    /// Drops the pending confirmation and returns to `Editing`
    ///
    /// The candidate is kept so the user can adjust it.
    pub fn cancel_confirmation(&mut self) -> Result<(), ConflictError> {
        self.require(&[ResolutionState::ConfirmingOverwrite], "cancel confirmation")?;
        self.transition(ResolutionState::Editing)?;
        debug!(session_id = %self.session_id, candidate = %self.candidate(), "Confirmation cancelled");
        Ok(())
    }

    /// Returns the first free `base (N)` name for the current candidate
    ///
    /// Pure; callable in any state.
    pub fn suggest_alternative_name(&self) -> String {
        ConflictNamer::suggest(self.candidate(), self.snapshot())
    }

    /// Takes the suggested name as the new candidate and returns to `Editing`
    ///
    /// Valid while editing or confirming. Returns the accepted name.
    pub fn accept_suggestion(&mut self) -> Result<String, ConflictError> {
        self.require(
            &[ResolutionState::Editing, ResolutionState::ConfirmingOverwrite],
            "accept suggestion",
        )?;

        let suggestion = self.suggest_alternative_name();
        if self.state == ResolutionState::ConfirmingOverwrite {
            self.transition(ResolutionState::Editing)?;
        }
        self.request.set_candidate(&suggestion);

        debug!(
            session_id = %self.session_id,
            candidate = %suggestion,
            "Suggested name accepted"
        );
        Ok(suggestion)
    }

    /// Cancels the save
    ///
    /// Moves to `Aborted` from `Editing` or `ConfirmingOverwrite`. A no-op
    /// once the session has finished.
    pub fn abort(&mut self) {
        if self.state.is_terminal() {
            trace!(session_id = %self.session_id, state = %self.state, "Abort ignored");
            return;
        }
        self.state = ResolutionState::Aborted;
        info!(session_id = %self.session_id, "Save aborted");
    }

    fn commit(&mut self, name: DocumentName, overwrite: bool) -> Result<Decision, ConflictError> {
        self.transition(ResolutionState::Committed)?;
        info!(
            session_id = %self.session_id,
            name = %name,
            overwrite,
            "Save committed"
        );
        Ok(Decision::Commit { name, overwrite })
    }

    fn require(
        &self,
        allowed: &[ResolutionState],
        operation: &'static str,
    ) -> Result<(), ConflictError> {
        if allowed.contains(&self.state) {
            return Ok(());
        }
        Err(ConflictError::InvalidState {
            state: self.state,
            operation,
        })
    }

    fn transition(&mut self, target: ResolutionState) -> Result<(), ConflictError> {
        self.state = self.state.transition_to(target)?;
        Ok(())
    }
}
