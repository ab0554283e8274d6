//! Conflict policy for non-interactive saves
//!
//! When nobody is present to answer an overwrite prompt (scripts, CLI flags,
//! configuration defaults), a `ConflictPolicy` stands in for the user's
//! choice in the three-way cancel / rename / overwrite decision.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::ConflictError;

/// Answer to a name collision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Ask the user
    #[default]
    Prompt,
    /// Replace the existing document
    Overwrite,
    /// Save under the next free `name (N)`
    Rename,
    /// Do not save
    Abort,
}

impl ConflictPolicy {
    /// Returns true if this policy needs a person to decide
    pub fn is_interactive(&self) -> bool {
        matches!(self, ConflictPolicy::Prompt)
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConflictPolicy::Prompt => "prompt",
            ConflictPolicy::Overwrite => "overwrite",
            ConflictPolicy::Rename => "rename",
            ConflictPolicy::Abort => "abort",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ConflictPolicy {
    type Err = ConflictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let policy = match s.trim().to_lowercase().as_str() {
            "prompt" | "ask" => ConflictPolicy::Prompt,
            "overwrite" | "replace" => ConflictPolicy::Overwrite,
            "rename" | "keep_both" => ConflictPolicy::Rename,
            "abort" | "cancel" => ConflictPolicy::Abort,
            _ => return Err(ConflictError::InvalidPolicy(s.to_string())),
        };
        trace!(input = %s, policy = %policy, "Parsed conflict policy");
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_policies() {
        assert_eq!("prompt".parse::<ConflictPolicy>().unwrap(), ConflictPolicy::Prompt);
        assert_eq!("overwrite".parse::<ConflictPolicy>().unwrap(), ConflictPolicy::Overwrite);
        assert_eq!("rename".parse::<ConflictPolicy>().unwrap(), ConflictPolicy::Rename);
        assert_eq!("abort".parse::<ConflictPolicy>().unwrap(), ConflictPolicy::Abort);
    }

    #[test]
    fn test_parse_aliases_and_case() {
        assert_eq!(" Replace ".parse::<ConflictPolicy>().unwrap(), ConflictPolicy::Overwrite);
        assert_eq!("KEEP_BOTH".parse::<ConflictPolicy>().unwrap(), ConflictPolicy::Rename);
        assert_eq!("cancel".parse::<ConflictPolicy>().unwrap(), ConflictPolicy::Abort);
    }

    #[test]
    fn test_parse_invalid() {
        let err = "merge".parse::<ConflictPolicy>().unwrap_err();
        assert!(matches!(err, ConflictError::InvalidPolicy(ref s) if s == "merge"));
    }

    #[test]
    fn test_display_roundtrip() {
        for policy in [
            ConflictPolicy::Prompt,
            ConflictPolicy::Overwrite,
            ConflictPolicy::Rename,
            ConflictPolicy::Abort,
        ] {
            assert_eq!(policy.to_string().parse::<ConflictPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_only_prompt_is_interactive() {
        assert!(ConflictPolicy::Prompt.is_interactive());
        assert!(!ConflictPolicy::Rename.is_interactive());
    }
}
