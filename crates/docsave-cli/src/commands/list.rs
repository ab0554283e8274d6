//! List command - show the documents in the document directory

use std::path::PathBuf;

use anyhow::{Context, Result};

use docsave_core::ports::IDocumentStore;

use super::AppContext;
use crate::output::get_formatter;

/// Arguments for the list subcommand
#[derive(Debug, clap::Args)]
pub struct ListCommand {
    /// Document directory (defaults to save.directory from the config)
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

impl ListCommand {
    /// Execute the list command
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let formatter = get_formatter(ctx.format);
        let store = ctx.store(self.dir.as_ref());
        let snapshot = store
            .list_names()
            .await
            .context("Failed to list documents")?;

        if ctx.format.is_json() {
            formatter.print_json(&serde_json::json!({
                "directory": store.root().display().to_string(),
                "count": snapshot.len(),
                "documents": snapshot,
            }));
            return Ok(());
        }

        if snapshot.is_empty() {
            formatter.info(&format!("No documents in {}", store.root().display()));
            return Ok(());
        }

        formatter.success(&format!(
            "{} document{} in {}",
            snapshot.len(),
            if snapshot.len() == 1 { "" } else { "s" },
            store.root().display()
        ));
        for name in &snapshot {
            formatter.info(&format!("  {}", name));
        }

        Ok(())
    }
}
