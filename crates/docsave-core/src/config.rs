//! Configuration module for docsave.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, host-based environment resolution and a
//! builder pattern for programmatic use.

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for docsave.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub environments: EnvironmentsConfig,
    pub save: SaveConfig,
    pub logging: LoggingConfig,
}

/// Storage environments, selected by the host the editor is served from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentsConfig {
    /// Profile used when no profile lists the host.
    pub default_profile: String,
    /// Known environments, checked in order.
    pub profiles: Vec<EnvironmentProfile>,
}

/// One storage environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentProfile {
    pub name: String,
    /// Host names (without port) that select this profile.
    #[serde(default)]
    pub hosts: Vec<String>,
    pub endpoint: String,
    pub bucket: String,
    #[serde(default)]
    pub auth_enabled: bool,
}

/// Save workflow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    /// Directory used by the local document store.
    pub directory: PathBuf,
    /// File extension appended to document names on disk, including the dot.
    pub extension: String,
    /// What to do on a name collision: `prompt`, `overwrite`, `rename`, or `abort`.
    pub on_conflict: String,
    /// Re-check the store for a same-named document right before a
    /// non-overwrite commit.
    pub recheck_on_commit: bool,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

/// Storage settings resolved for one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationSet {
    /// Name of the profile the settings came from.
    pub profile: String,
    pub endpoint: String,
    pub bucket: String,
    pub auth_enabled: bool,
}

impl From<&EnvironmentProfile> for ConfigurationSet {
    fn from(profile: &EnvironmentProfile) -> Self {
        Self {
            profile: profile.name.clone(),
            endpoint: profile.endpoint.clone(),
            bucket: profile.bucket.clone(),
            auth_enabled: profile.auth_enabled,
        }
    }
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/docsave/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("docsave")
            .join("config.yaml")
    }

    /// Resolve the storage settings for `host`.
    ///
    /// The first profile listing the host wins. Hosts are compared
    /// case-insensitively with any port removed. Unknown hosts get the
    /// default profile.
    ///
    /// # Errors
    ///
    /// Fails if no profile matches and the default profile does not exist.
    pub fn resolve_config(&self, host: &str) -> anyhow::Result<ConfigurationSet> {
        let wanted = normalize_host(host);

        let matched = self.environments.profiles.iter().find(|profile| {
            profile
                .hosts
                .iter()
                .any(|candidate| normalize_host(candidate) == wanted)
        });

        if let Some(profile) = matched {
            return Ok(profile.into());
        }

        self.environments
            .profiles
            .iter()
            .find(|profile| profile.name == self.environments.default_profile)
            .map(ConfigurationSet::from)
            .ok_or_else(|| {
                anyhow!(
                    "no environment matches host '{}' and default profile '{}' is not defined",
                    host,
                    self.environments.default_profile
                )
            })
    }
}

/// Lowercase a host and strip a trailing `:port`.
///
/// Bracketed IPv6 literals keep their brackets: `[::1]:8080` becomes `[::1]`.
fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let without_port = if host.starts_with('[') {
        match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        }
    } else {
        match host.rsplit_once(':') {
            Some((name, port))
                if !name.contains(':') && port.chars().all(|c| c.is_ascii_digit()) =>
            {
                name
            }
            _ => host,
        }
    };
    without_port.to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// Config::default()
// ---------------------------------------------------------------------------

impl Default for EnvironmentsConfig {
    fn default() -> Self {
        Self {
            default_profile: "production".to_string(),
            profiles: vec![
                EnvironmentProfile {
                    name: "local".to_string(),
                    hosts: vec!["localhost".to_string(), "127.0.0.1".to_string()],
                    endpoint: "http://localhost:9000".to_string(),
                    bucket: "documents-dev".to_string(),
                    auth_enabled: false,
                },
                EnvironmentProfile {
                    name: "production".to_string(),
                    hosts: Vec::new(),
                    endpoint: "https://storage.docsave.app".to_string(),
                    bucket: "documents".to_string(),
                    auth_enabled: true,
                },
            ],
        }
    }
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            directory: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("~/.local/share"))
                .join("docsave")
                .join("documents"),
            extension: ".json".to_string(),
            on_conflict: "prompt".to_string(),
            recheck_on_commit: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"save.extension"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid values for `save.on_conflict`.
const VALID_CONFLICT_POLICIES: &[&str] = &["prompt", "overwrite", "rename", "abort"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- environments ---
        let profiles = &self.environments.profiles;
        if !profiles
            .iter()
            .any(|p| p.name == self.environments.default_profile)
        {
            errors.push(ValidationError {
                field: "environments.default_profile".into(),
                message: format!(
                    "profile '{}' is not defined",
                    self.environments.default_profile
                ),
            });
        }

        let mut seen_names: Vec<&str> = Vec::new();
        let mut seen_hosts: Vec<String> = Vec::new();
        for (i, profile) in profiles.iter().enumerate() {
            if profile.name.trim().is_empty() {
                errors.push(ValidationError {
                    field: format!("environments.profiles[{i}].name"),
                    message: "must not be empty".into(),
                });
            } else if seen_names.contains(&profile.name.as_str()) {
                errors.push(ValidationError {
                    field: format!("environments.profiles[{i}].name"),
                    message: format!("duplicate profile '{}'", profile.name),
                });
            } else {
                seen_names.push(&profile.name);
            }

            if profile.endpoint.trim().is_empty() {
                errors.push(ValidationError {
                    field: format!("environments.profiles[{i}].endpoint"),
                    message: "must not be empty".into(),
                });
            }
            if profile.bucket.trim().is_empty() {
                errors.push(ValidationError {
                    field: format!("environments.profiles[{i}].bucket"),
                    message: "must not be empty".into(),
                });
            }

            for host in &profile.hosts {
                let host = normalize_host(host);
                if seen_hosts.contains(&host) {
                    errors.push(ValidationError {
                        field: format!("environments.profiles[{i}].hosts"),
                        message: format!("host '{host}' is listed by more than one profile"),
                    });
                } else {
                    seen_hosts.push(host);
                }
            }
        }

        // --- save ---
        if self.save.extension.is_empty() || !self.save.extension.starts_with('.') {
            errors.push(ValidationError {
                field: "save.extension".into(),
                message: format!(
                    "must start with '.', got '{}'",
                    self.save.extension
                ),
            });
        } else if self.save.extension.len() == 1 || self.save.extension.contains('/') {
            errors.push(ValidationError {
                field: "save.extension".into(),
                message: format!("invalid extension '{}'", self.save.extension),
            });
        }
        if !VALID_CONFLICT_POLICIES.contains(&self.save.on_conflict.as_str()) {
            errors.push(ValidationError {
                field: "save.on_conflict".into(),
                message: format!(
                    "invalid policy '{}'; valid options: {}",
                    self.save.on_conflict,
                    VALID_CONFLICT_POLICIES.join(", ")
                ),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use docsave_core::config::ConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = ConfigBuilder::new()
///     .save_directory(PathBuf::from("/srv/documents"))
///     .save_on_conflict("rename")
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- environments ---

    pub fn default_profile(mut self, name: impl Into<String>) -> Self {
        self.config.environments.default_profile = name.into();
        self
    }

    /// Replace all profiles.
    pub fn profiles(mut self, profiles: Vec<EnvironmentProfile>) -> Self {
        self.config.environments.profiles = profiles;
        self
    }

    /// Append one profile after the existing ones.
    pub fn profile(mut self, profile: EnvironmentProfile) -> Self {
        self.config.environments.profiles.push(profile);
        self
    }

    // --- save ---

    pub fn save_directory(mut self, directory: PathBuf) -> Self {
        self.config.save.directory = directory;
        self
    }

    pub fn save_extension(mut self, extension: impl Into<String>) -> Self {
        self.config.save.extension = extension.into();
        self
    }

    pub fn save_on_conflict(mut self, policy: impl Into<String>) -> Self {
        self.config.save.on_conflict = policy.into();
        self
    }

    pub fn save_recheck_on_commit(mut self, recheck: bool) -> Self {
        self.config.save.recheck_on_commit = recheck;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Start from an existing configuration, e.g. one loaded from disk.
impl From<Config> for ConfigBuilder {
    fn from(config: Config) -> Self {
        Self { config }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
