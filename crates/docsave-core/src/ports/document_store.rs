//! Document store port (driven/secondary port)
//!
//! This module defines the interface for persisting documents by name.
//! The save workflow only ever needs three things from storage: the set
//! of names that already exist, a point lookup, and a write.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because storage errors are adapter-specific.
//! - `save` replaces any existing document with the same name. Whether that
//!   is allowed has already been decided by the conflict resolver.

use crate::domain::newtypes::{DocumentName, NameSnapshot};

/// Port trait for document persistence
///
/// ## Implementation Notes
///
/// - Name comparison must be exact and case-sensitive so that
///   `list_names` and `exists` agree with `NameSnapshot::contains`.
/// - Implementations should handle concurrent access gracefully but are not
///   required to detect races between `list_names` and `save`.
#[async_trait::async_trait]
pub trait IDocumentStore: Send + Sync {
    /// Returns the names of all stored documents
    ///
    /// The result is a point-in-time copy; later writes do not update it.
    async fn list_names(&self) -> anyhow::Result<NameSnapshot>;

    /// Returns true if a document called `name` currently exists
    async fn exists(&self, name: &DocumentName) -> anyhow::Result<bool>;

    /// Writes `contents` under `name`, replacing any existing document
    ///
    /// # Errors
    /// Returns an error if the document cannot be written
    async fn save(&self, name: &DocumentName, contents: &[u8]) -> anyhow::Result<()>;
}
