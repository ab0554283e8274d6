//! CLI subcommands
//!
//! Every command receives the same [`AppContext`], built once in `main`
//! from the configuration file and the host. The storage environment is
//! resolved only by the commands that need it, so `config` can still
//! inspect and repair a file whose environments are broken.

pub mod completions;
pub mod config;
pub mod list;
pub mod save;
pub mod suggest;

use std::path::PathBuf;

use anyhow::Result;

use docsave_core::config::{Config, ConfigurationSet};

use crate::{output::OutputFormat, store::LocalDirectoryStore};

/// Settings shared by all commands
#[derive(Debug, Clone)]
pub struct AppContext {
    pub format: OutputFormat,
    pub config: Config,
    pub config_path: PathBuf,
    /// Host used to pick the storage environment
    pub host: String,
}

impl AppContext {
    /// Resolves the storage environment for the context's host
    pub fn environment(&self) -> Result<ConfigurationSet> {
        self.config.resolve_config(&self.host)
    }

    /// Opens the local store, preferring `dir` over the configured directory
    pub fn store(&self, dir: Option<&PathBuf>) -> LocalDirectoryStore {
        let root = dir
            .cloned()
            .unwrap_or_else(|| self.config.save.directory.clone());
        LocalDirectoryStore::new(root, self.config.save.extension.clone())
    }
}
