//! Local directory document store
//!
//! Keeps each document as `<root>/<name><extension>`. Writes go through a
//! temporary file in the same directory followed by a rename, so a reader
//! never sees a half-written document.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, trace, warn};

use docsave_core::domain::{DocumentName, DomainError, NameSnapshot};
use docsave_core::ports::IDocumentStore;

/// [`IDocumentStore`] backed by a single directory
#[derive(Debug, Clone)]
pub struct LocalDirectoryStore {
    root: PathBuf,
    extension: String,
}

impl LocalDirectoryStore {
    pub fn new(root: PathBuf, extension: impl Into<String>) -> Self {
        Self {
            root,
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Checks that `name` can be stored as a file in the root directory
    ///
    /// Names that would escape the directory or hide as dotfiles are refused.
    pub fn check_name(&self, name: &str) -> Result<(), DomainError> {
        if name.contains(['/', '\\', '\0']) || name.starts_with('.') {
            return Err(DomainError::InvalidName(name.to_string()));
        }
        Ok(())
    }

    /// Maps a document name to its file
    pub fn path_for(&self, name: &DocumentName) -> Result<PathBuf> {
        let raw = name.as_str();
        self.check_name(raw)?;
        Ok(self.root.join(format!("{raw}{}", self.extension)))
    }
}

#[async_trait::async_trait]
impl IDocumentStore for LocalDirectoryStore {
    async fn list_names(&self) -> Result<NameSnapshot> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(root = %self.root.display(), "Document directory missing, empty snapshot");
                return Ok(NameSnapshot::new());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read document directory {}", self.root.display())
                })
            }
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                trace!(path = %entry.path().display(), "Skipping non UTF-8 file name");
                continue;
            };
            if file_name.starts_with('.') {
                continue;
            }
            match file_name.strip_suffix(self.extension.as_str()) {
                Some(name) if !name.is_empty() => names.push(name.to_string()),
                _ => {}
            }
        }

        debug!(root = %self.root.display(), count = names.len(), "Listed documents");
        Ok(names.into_iter().collect())
    }

    async fn exists(&self, name: &DocumentName) -> Result<bool> {
        let path = self.path_for(name)?;
        tokio::fs::try_exists(&path)
            .await
            .with_context(|| format!("Failed to check {}", path.display()))
    }

    async fn save(&self, name: &DocumentName, contents: &[u8]) -> Result<()> {
        let path = self.path_for(name)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create {}", self.root.display()))?;

        let tmp = self
            .root
            .join(format!(".{}{}.tmp", name.as_str(), self.extension));
        tokio::fs::write(&tmp, contents)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                warn!(path = %tmp.display(), error = %cleanup, "Failed to remove temporary file");
            }
            return Err(e)
                .with_context(|| format!("Failed to move document into {}", path.display()));
        }

        debug!(path = %path.display(), bytes = contents.len(), "Document written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> DocumentName {
        DocumentName::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDirectoryStore::new(dir.path().join("missing"), ".json");
        assert!(store.list_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDirectoryStore::new(dir.path().join("docs"), ".json");

        store.save(&name("Invoice"), b"{}").await.unwrap();
        store.save(&name("Invoice (1)"), b"{}").await.unwrap();

        let snapshot = store.list_names().await.unwrap();
        assert_eq!(
            snapshot.iter().collect::<Vec<_>>(),
            vec!["Invoice", "Invoice (1)"]
        );
        assert!(store.exists(&name("Invoice")).await.unwrap());
        assert!(!store.exists(&name("invoice")).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_skips_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::write(dir.path().join(".Plan.json.tmp"), b"x").unwrap();
        std::fs::write(dir.path().join(".json"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("folder.json")).unwrap();
        std::fs::write(dir.path().join("Plan.json"), b"x").unwrap();

        let store = LocalDirectoryStore::new(dir.path().to_path_buf(), ".json");
        let snapshot = store.list_names().await.unwrap();
        assert_eq!(snapshot.iter().collect::<Vec<_>>(), vec!["Plan"]);
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDirectoryStore::new(dir.path().to_path_buf(), ".canvas");

        store.save(&name("Plan"), b"v1").await.unwrap();
        store.save(&name("Plan"), b"v2").await.unwrap();

        let contents = std::fs::read(dir.path().join("Plan.canvas")).unwrap();
        assert_eq!(contents, b"v2");
        assert_eq!(store.list_names().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_path_like_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDirectoryStore::new(dir.path().to_path_buf(), ".json");

        for bad in ["../escape", "a/b", "a\\b", ".hidden"] {
            assert!(store.save(&name(bad), b"x").await.is_err(), "{bad}");
        }
        assert!(store.list_names().await.unwrap().is_empty());
    }

    #[test]
    fn test_check_name() {
        let store = LocalDirectoryStore::new(PathBuf::from("/tmp/docs"), ".json");
        assert!(store.check_name("Invoice (2)").is_ok());
        assert!(matches!(
            store.check_name("a/b"),
            Err(DomainError::InvalidName(name)) if name == "a/b"
        ));
        assert!(store.check_name(".hidden").is_err());
    }

    #[tokio::test]
    async fn test_failed_move_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDirectoryStore::new(dir.path().to_path_buf(), ".json");

        // A non-empty directory in the way makes the rename fail
        let blocker = dir.path().join("Plan.json");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), b"x").unwrap();

        assert!(store.save(&name("Plan"), b"v1").await.is_err());
        assert!(!dir.path().join(".Plan.json.tmp").exists());
        assert!(blocker.join("keep").exists());
    }
}
