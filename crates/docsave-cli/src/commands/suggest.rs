//! Suggest command - show the name a save would fall back to

use std::path::PathBuf;

use anyhow::{Context, Result};

use docsave_conflict::ConflictNamer;
use docsave_core::ports::IDocumentStore;

use super::AppContext;
use crate::output::get_formatter;

/// Arguments for the suggest subcommand
#[derive(Debug, clap::Args)]
pub struct SuggestCommand {
    /// Name to check
    pub name: String,

    /// Document directory (defaults to save.directory from the config)
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

impl SuggestCommand {
    /// Execute the suggest command
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let formatter = get_formatter(ctx.format);
        let store = ctx.store(self.dir.as_ref());
        let snapshot = store
            .list_names()
            .await
            .context("Failed to list documents")?;

        let candidate = self.name.trim();
        let collision = snapshot.contains(candidate);
        let suggestion = ConflictNamer::suggest(candidate, &snapshot);

        if ctx.format.is_json() {
            formatter.print_json(&serde_json::json!({
                "name": candidate,
                "collision": collision,
                "suggestion": suggestion,
            }));
        } else if collision {
            formatter.warn(&format!("'{}' already exists", candidate));
            formatter.info(&format!("Suggested name: {}", suggestion));
        } else {
            formatter.success(&format!("'{}' is free", candidate));
            formatter.info(&format!("Next free variant: {}", suggestion));
        }

        Ok(())
    }
}
