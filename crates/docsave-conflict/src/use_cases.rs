//! Save use cases - connect the resolver to a document store
//!
//! The resolver decides; these use cases take the snapshot it decides
//! against and carry out the write once it commits.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use docsave_core::{
    domain::{Decision, DocumentName, DomainError, NameSnapshot},
    ports::IDocumentStore,
};

use crate::{error::ConflictError, policy::ConflictPolicy, resolver::ConflictResolver};

/// Record of a completed write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveReceipt {
    pub name: DocumentName,
    /// True when the resolver committed over an existing document
    pub overwritten: bool,
    pub saved_at: DateTime<Utc>,
}

/// Orchestrates snapshotting, resolution and persistence
pub struct SaveDocumentUseCase {
    store: Arc<dyn IDocumentStore>,
    recheck_on_commit: bool,
}

impl SaveDocumentUseCase {
    pub fn new(store: Arc<dyn IDocumentStore>) -> Self {
        Self {
            store,
            recheck_on_commit: false,
        }
    }

    /// Re-check the store right before a non-overwrite write
    ///
    /// Closes the window between the snapshot and the write at the cost of
    /// one extra lookup. A name that appeared in the meantime fails with
    /// [`ConflictError::StaleSnapshot`] instead of being overwritten silently.
    pub fn with_recheck_on_commit(mut self, recheck: bool) -> Self {
        self.recheck_on_commit = recheck;
        self
    }

    /// Takes a fresh snapshot of existing names
    pub async fn snapshot(&self) -> Result<NameSnapshot, ConflictError> {
        self.store
            .list_names()
            .await
            .map_err(|e| ConflictError::Storage(e.context("list documents")))
    }

    /// Opens a resolver for `current_name` against a fresh snapshot
    pub async fn open(&self, current_name: &str) -> Result<ConflictResolver, ConflictError> {
        let snapshot = self.snapshot().await?;
        Ok(ConflictResolver::new(current_name, snapshot))
    }

    /// Writes `contents` for a commit decision
    ///
    /// # Errors
    ///
    /// - [`ConflictError::NotCommitted`] for any decision other than `Commit`
    /// - [`ConflictError::StaleSnapshot`] when re-checking is on and the name
    ///   now exists
    /// - [`ConflictError::Storage`] when the store fails
    pub async fn commit(
        &self,
        decision: &Decision,
        contents: &[u8],
    ) -> Result<SaveReceipt, ConflictError> {
        let (name, overwrite) = match decision {
            Decision::Commit { name, overwrite } => (name, *overwrite),
            other => return Err(ConflictError::NotCommitted(other.to_string())),
        };

        if self.recheck_on_commit && !overwrite {
            let exists = self
                .store
                .exists(name)
                .await
                .map_err(|e| ConflictError::Storage(e.context("re-check document")))?;
            if exists {
                warn!(name = %name, "Document appeared after snapshot, refusing to overwrite");
                return Err(ConflictError::StaleSnapshot(name.to_string()));
            }
        }

        self.store
            .save(name, contents)
            .await
            .map_err(|e| ConflictError::Storage(e.context("save document")))?;

        info!(name = %name, overwrite, bytes = contents.len(), "Document saved");

        Ok(SaveReceipt {
            name: name.clone(),
            overwritten: overwrite,
            saved_at: Utc::now(),
        })
    }

    /// Saves without a person in the loop
    ///
    /// A collision is answered with `policy`. Returns `None` when the policy
    /// aborts the save.
    pub async fn save_with_policy(
        &self,
        current_name: &str,
        contents: &[u8],
        policy: ConflictPolicy,
    ) -> Result<Option<SaveReceipt>, ConflictError> {
        let mut resolver = self.open(current_name).await?;
        let candidate = resolver.candidate().to_string();

        let decision = match resolver.submit(&candidate)? {
            Decision::Reject => return Err(DomainError::EmptyName.into()),
            Decision::NeedsConfirmation => {
                debug!(candidate = %candidate, policy = %policy, "Applying conflict policy");
                match policy {
                    ConflictPolicy::Prompt => {
                        return Err(ConflictError::ConfirmationRequired(candidate));
                    }
                    ConflictPolicy::Overwrite => resolver.confirm_overwrite()?,
                    ConflictPolicy::Rename => {
                        let renamed = resolver.accept_suggestion()?;
                        resolver.submit(renamed)?
                    }
                    ConflictPolicy::Abort => {
                        resolver.abort();
                        return Ok(None);
                    }
                }
            }
            commit => commit,
        };

        self.commit(&decision, contents).await.map(Some)
    }
}
