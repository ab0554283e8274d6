//! Save command - write a document, resolving name collisions
//!
//! Provides the `docsave save` CLI command which:
//! 1. Takes a snapshot of the names already in the document directory
//! 2. Runs the conflict resolver for the requested name
//! 3. Asks on the terminal, or applies `--on-conflict`, when the name is taken
//! 4. Writes the document under the committed name

use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use tracing::{debug, info};

use docsave_conflict::{
    ConflictError, ConflictPolicy, SaveDialog, SaveDocumentUseCase, SaveReceipt,
};

use docsave_core::config::ConfigurationSet;

use super::AppContext;
use crate::{output::get_formatter, prompt, store::LocalDirectoryStore};

/// Written when no `--input` is given
const EMPTY_DOCUMENT: &[u8] = b"{}\n";

/// Arguments for the save subcommand
#[derive(Debug, clap::Args)]
pub struct SaveCommand {
    /// Name to save the document under
    pub name: String,

    /// Document directory (defaults to save.directory from the config)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// File whose contents are saved (defaults to an empty document)
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// What to do when the name is taken: prompt, overwrite, rename, abort
    #[arg(long)]
    pub on_conflict: Option<String>,
}

impl SaveCommand {
    /// Execute the save command
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let formatter = get_formatter(ctx.format);

        let policy: ConflictPolicy = self
            .on_conflict
            .as_deref()
            .unwrap_or(ctx.config.save.on_conflict.as_str())
            .parse()?;

        let contents = match &self.input {
            Some(path) => tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?,
            None => EMPTY_DOCUMENT.to_vec(),
        };

        let environment = ctx.environment()?;
        let store = ctx.store(self.dir.as_ref());
        let root = store.root().clone();
        let use_case = SaveDocumentUseCase::new(Arc::new(store.clone()))
            .with_recheck_on_commit(ctx.config.save.recheck_on_commit);

        info!(
            name = %self.name,
            policy = %policy,
            dir = %root.display(),
            profile = %environment.profile,
            "Saving document"
        );

        let receipt = if policy.is_interactive() && !ctx.format.is_json() {
            self.save_interactive(&use_case, &store, &contents).await?
        } else {
            match use_case
                .save_with_policy(&self.name, &contents, policy)
                .await
            {
                Ok(receipt) => receipt,
                Err(ConflictError::ConfirmationRequired(name)) => {
                    let message = format!(
                        "'{}' already exists. Use --on-conflict overwrite|rename|abort",
                        name
                    );
                    if ctx.format.is_json() {
                        formatter.print_json(&serde_json::json!({
                            "saved": false,
                            "conflict": name,
                            "error": message,
                        }));
                        return Ok(());
                    }
                    anyhow::bail!(message);
                }
                Err(e) => return Err(e.into()),
            }
        };

        match receipt {
            Some(receipt) => self.report_saved(ctx, &environment, &root, &receipt)?,
            None => {
                debug!(name = %self.name, "Save cancelled");
                if ctx.format.is_json() {
                    formatter.print_json(&serde_json::json!({
                        "saved": false,
                        "name": self.name,
                    }));
                } else {
                    formatter.warn("Save cancelled");
                }
            }
        }

        Ok(())
    }

    /// Runs the terminal dialog against a fresh snapshot
    async fn save_interactive(
        &self,
        use_case: &SaveDocumentUseCase,
        store: &LocalDirectoryStore,
        contents: &[u8],
    ) -> Result<Option<SaveReceipt>> {
        let resolver = use_case.open(&self.name).await?;
        let mut dialog = SaveDialog::from_resolver(resolver);

        let decision = {
            let stdin = io::stdin();
            prompt::run_dialog(&mut dialog, stdin.lock(), io::stderr(), |name| {
                store.check_name(name)
            })?
        };

        match decision {
            Some(decision) => Ok(Some(use_case.commit(&decision, contents).await?)),
            None => Ok(None),
        }
    }

    fn report_saved(
        &self,
        ctx: &AppContext,
        environment: &ConfigurationSet,
        root: &Path,
        receipt: &SaveReceipt,
    ) -> Result<()> {
        let formatter = get_formatter(ctx.format);

        if ctx.format.is_json() {
            let mut json = serde_json::to_value(receipt).context("Failed to serialize receipt")?;
            if let Some(object) = json.as_object_mut() {
                object.insert("saved".to_string(), serde_json::Value::Bool(true));
                object.insert(
                    "directory".to_string(),
                    serde_json::Value::String(root.display().to_string()),
                );
                object.insert(
                    "environment".to_string(),
                    serde_json::to_value(environment)
                        .context("Failed to serialize environment")?,
                );
            }
            formatter.print_json(&json);
        } else {
            let verb = if receipt.overwritten { "Overwrote" } else { "Saved" };
            formatter.success(&format!("{} '{}'", verb, receipt.name));
            formatter.info(&format!("  Directory:   {}", root.display()));
            formatter.info(&format!(
                "  Environment: {} ({})",
                environment.profile, environment.endpoint
            ));
        }

        Ok(())
    }
}
