//! Config command - View and manage docsave configuration
//!
//! Provides the `docsave config` CLI command which:
//! 1. Shows the current configuration (YAML or JSON)
//! 2. Sets individual configuration values via dot-notation keys
//! 3. Validates the configuration file and reports errors
//! 4. Resolves the storage environment for a host

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use tracing::info;

use docsave_core::config::{Config, ConfigBuilder};

use super::AppContext;
use crate::output::get_formatter;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "save.on_conflict")
        key: String,
        /// New value
        value: String,
    },
    /// Validate configuration file
    Validate,
    /// Show the storage environment selected for a host
    Resolve {
        /// Host name, defaults to --host / DOCSAVE_HOST
        host: Option<String>,
    },
}

impl ConfigCommand {
    /// Execute the config command
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        match self {
            ConfigCommand::Show => self.execute_show(ctx).await,
            ConfigCommand::Set { key, value } => self.execute_set(ctx, key, value).await,
            ConfigCommand::Validate => self.execute_validate(ctx).await,
            ConfigCommand::Resolve { host } => self.execute_resolve(ctx, host.as_deref()).await,
        }
    }

    async fn execute_show(&self, ctx: &AppContext) -> Result<()> {
        let formatter = get_formatter(ctx.format);

        info!(config_path = %ctx.config_path.display(), "Showing configuration");

        if ctx.format.is_json() {
            let json = serde_json::to_value(&ctx.config)
                .context("Failed to serialize configuration to JSON")?;
            formatter.print_json(&json);
        } else {
            formatter.success(&format!("Configuration ({})", ctx.config_path.display()));
            formatter.info("");

            let yaml = serde_yaml::to_string(&ctx.config)
                .context("Failed to serialize configuration to YAML")?;

            for line in yaml.lines() {
                formatter.info(line);
            }
        }

        Ok(())
    }

    async fn execute_set(&self, ctx: &AppContext, key: &str, value: &str) -> Result<()> {
        let formatter = get_formatter(ctx.format);

        info!(key = %key, value = %value, "Setting configuration value");

        let builder = match apply_config_value(ConfigBuilder::from(ctx.config.clone()), key, value)
        {
            Ok(builder) => builder,
            Err(e) => {
                if ctx.format.is_json() {
                    formatter.print_json(&serde_json::json!({
                        "success": false,
                        "key": key,
                        "value": value,
                        "error": e.to_string(),
                    }));
                } else {
                    formatter.error(&format!("Failed to set '{}': {}", key, e));
                    formatter.info("");
                    formatter.info("Supported keys:");
                    formatter.info("  environments.default_profile  - Profile for unknown hosts");
                    formatter.info("  save.directory                - Local document directory");
                    formatter.info("  save.extension                - File extension, e.g. .json");
                    formatter.info("  save.on_conflict              - prompt|overwrite|rename|abort");
                    formatter.info("  save.recheck_on_commit        - true|false");
                    formatter.info("  logging.level                 - trace|debug|info|warn|error");
                }
                return Ok(());
            }
        };

        let config = match builder.build_validated() {
            Ok(config) => config,
            Err(errors) => {
                let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                if ctx.format.is_json() {
                    formatter.print_json(&serde_json::json!({
                        "success": false,
                        "key": key,
                        "value": value,
                        "errors": messages,
                    }));
                } else {
                    formatter.error(&format!(
                        "Invalid value for '{}': {}",
                        key,
                        messages.join("; ")
                    ));
                }
                return Ok(());
            }
        };

        if let Some(parent) = ctx.config_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create configuration directory")?;
        }
        let yaml = serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
        std::fs::write(&ctx.config_path, yaml).context("Failed to write configuration file")?;

        if ctx.format.is_json() {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "key": key,
                "value": value,
                "config_path": ctx.config_path.display().to_string(),
            }));
        } else {
            formatter.success(&format!("Set {} = {}", key, value));
            formatter.info(&format!("Saved to {}", ctx.config_path.display()));
        }

        Ok(())
    }

    async fn execute_validate(&self, ctx: &AppContext) -> Result<()> {
        let formatter = get_formatter(ctx.format);
        let config_path = &ctx.config_path;

        // Load the file explicitly; the context already fell back to defaults
        let config = match Config::load(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                let message = if config_path.exists() {
                    format!("Failed to parse configuration: {}", e)
                } else {
                    "Configuration file not found. Using defaults.".to_string()
                };
                if ctx.format.is_json() {
                    formatter.print_json(&serde_json::json!({
                        "valid": false,
                        "config_path": config_path.display().to_string(),
                        "errors": [message],
                    }));
                } else {
                    formatter.error(&message);
                    formatter.info(&format!("File: {}", config_path.display()));
                }
                return Ok(());
            }
        };

        info!(config_path = %config_path.display(), "Validating configuration");

        let errors = config.validate();

        if ctx.format.is_json() {
            let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            formatter.print_json(&serde_json::json!({
                "valid": errors.is_empty(),
                "config_path": config_path.display().to_string(),
                "errors": error_strings,
            }));
        } else if errors.is_empty() {
            formatter.success("Configuration is valid");
            formatter.info(&format!("File: {}", config_path.display()));
        } else {
            formatter.error(&format!(
                "Configuration has {} error{}:",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            ));
            formatter.info(&format!("File: {}", config_path.display()));
            formatter.info("");
            for error in &errors {
                formatter.info(&format!("  {} - {}", error.field, error.message));
            }
        }

        Ok(())
    }

    async fn execute_resolve(&self, ctx: &AppContext, host: Option<&str>) -> Result<()> {
        let formatter = get_formatter(ctx.format);

        let (host, environment) = match host {
            Some(host) => (host.to_string(), ctx.config.resolve_config(host)?),
            None => (ctx.host.clone(), ctx.environment()?),
        };

        if ctx.format.is_json() {
            formatter.print_json(&serde_json::json!({
                "host": host,
                "environment": environment,
            }));
        } else {
            formatter.success(&format!("{} -> {}", host, environment.profile));
            formatter.info(&format!("endpoint: {}", environment.endpoint));
            formatter.info(&format!("bucket:   {}", environment.bucket));
            formatter.info(&format!("auth:     {}", if environment.auth_enabled { "enabled" } else { "disabled" }));
        }

        Ok(())
    }
}

/// Apply a dot-notation key/value pair on top of `builder`
fn apply_config_value(builder: ConfigBuilder, key: &str, value: &str) -> Result<ConfigBuilder> {
    let builder = match key {
        "environments.default_profile" => builder.default_profile(value),
        "save.directory" => builder.save_directory(PathBuf::from(value)),
        "save.extension" => builder.save_extension(value),
        "save.on_conflict" => builder.save_on_conflict(value),
        "save.recheck_on_commit" => builder.save_recheck_on_commit(
            value
                .parse::<bool>()
                .context("Expected true or false for save.recheck_on_commit")?,
        ),
        "logging.level" => builder.logging_level(value),
        _ => bail!("unknown configuration key '{}'", key),
    };
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::output::OutputFormat;

    const BROKEN_ENVIRONMENTS: &str = "environments:\n  default_profile: staging\n  profiles: []\n";

    fn apply(key: &str, value: &str) -> Result<Config> {
        apply_config_value(ConfigBuilder::from(Config::default()), key, value).map(|b| b.build())
    }

    fn context_for(path: &Path, host: &str) -> AppContext {
        AppContext {
            format: OutputFormat::Quiet,
            config: Config::load_or_default(path),
            config_path: path.to_path_buf(),
            host: host.to_string(),
        }
    }

    #[test]
    fn test_apply_known_keys() {
        let config = apply_config_value(ConfigBuilder::new(), "save.on_conflict", "rename")
            .and_then(|b| apply_config_value(b, "save.recheck_on_commit", "true"))
            .and_then(|b| apply_config_value(b, "save.directory", "/srv/docs"))
            .unwrap()
            .build();

        assert_eq!(config.save.on_conflict, "rename");
        assert!(config.save.recheck_on_commit);
        assert_eq!(config.save.directory, PathBuf::from("/srv/docs"));
    }

    #[test]
    fn test_apply_keeps_other_values() {
        let mut base = Config::default();
        base.save.extension = ".canvas".to_string();

        let config = apply_config_value(ConfigBuilder::from(base), "logging.level", "debug")
            .unwrap()
            .build();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.save.extension, ".canvas");
    }

    #[test]
    fn test_apply_rejects_unknown_key() {
        assert!(apply("sync.root", "/tmp").is_err());
    }

    #[test]
    fn test_apply_rejects_bad_bool() {
        assert!(apply("save.recheck_on_commit", "yes").is_err());
    }

    #[tokio::test]
    async fn test_validate_runs_with_unresolvable_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, BROKEN_ENVIRONMENTS).unwrap();

        let ctx = context_for(&path, "example.org");
        assert!(ctx.environment().is_err());

        ConfigCommand::Validate.execute(&ctx).await.unwrap();
        ConfigCommand::Show.execute(&ctx).await.unwrap();
    }

    #[tokio::test]
    async fn test_set_refuses_still_invalid_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, BROKEN_ENVIRONMENTS).unwrap();

        let ctx = context_for(&path, "example.org");
        ConfigCommand::Set {
            key: "environments.default_profile".to_string(),
            value: "production".to_string(),
        }
        .execute(&ctx)
        .await
        .unwrap();

        // An empty profile list is still invalid, so nothing is written
        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded.environments.default_profile, "staging");
    }

    #[tokio::test]
    async fn test_set_default_profile_fixes_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut broken = Config::default();
        broken.environments.default_profile = "staging".to_string();
        std::fs::write(&path, serde_yaml::to_string(&broken).unwrap()).unwrap();

        let ctx = context_for(&path, "example.org");
        assert!(ctx.environment().is_err());

        ConfigCommand::Set {
            key: "environments.default_profile".to_string(),
            value: "production".to_string(),
        }
        .execute(&ctx)
        .await
        .unwrap();

        let repaired = context_for(&path, "example.org");
        assert_eq!(repaired.environment().unwrap().profile, "production");
    }

    #[tokio::test]
    async fn test_resolve_reports_unresolvable_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, BROKEN_ENVIRONMENTS).unwrap();

        let ctx = context_for(&path, "example.org");
        let result = ConfigCommand::Resolve { host: None }.execute(&ctx).await;
        assert!(result.is_err());
    }
}
