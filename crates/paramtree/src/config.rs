//! Tree configuration.
//!
//! Every knob has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! unsupported = "skip"
//! reset_on_reject = true
//! confirm_before_commit = true
//! root_name = "Root"
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// What the builder does with a field whose value matches no registry entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedPolicy {
    /// Fail the whole build with `TreeError::UnsupportedType`.
    #[default]
    Abort,
    /// Log a warning, leave the field out of the tree and record it in
    /// `Tree::skipped`.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TreeConfig {
    pub unsupported: UnsupportedPolicy,
    /// Re-display the authoritative value on a control whose edit was
    /// rejected.
    pub reset_on_reject: bool,
    /// Run a dry-run proposal before every commit.
    pub confirm_before_commit: bool,
    /// Name of the root node.
    pub root_name: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            unsupported: UnsupportedPolicy::Abort,
            reset_on_reject: true,
            confirm_before_commit: true,
            root_name: "Root".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
}

impl TreeConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(TreeConfig::from_toml_str("").unwrap(), TreeConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = TreeConfig::from_toml_str("unsupported = \"skip\"\nroot_name = \"Car\"").unwrap();
        assert_eq!(config.unsupported, UnsupportedPolicy::Skip);
        assert_eq!(config.root_name, "Car");
        assert!(config.reset_on_reject);
        assert!(config.confirm_before_commit);
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        assert!(TreeConfig::from_toml_str("unsupported = \"ignore\"").is_err());
        assert!(TreeConfig::from_toml_str("colour = \"red\"").is_err());
    }
}
