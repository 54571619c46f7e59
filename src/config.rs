//! config
//!
//! Content storage configuration.
//!
//! # Overview
//!
//! The storage layer has three tunables: the content file extension, the
//! unique-identifier flag (whether stored `uuid` fields are meaningful) and
//! the content locking flag. The configuration is an explicit value passed
//! into the storage handler; there is no ambient global state.
//!
//! # Example
//!
//! ```
//! use folio::config::ContentConfig;
//!
//! let config = ContentConfig::default();
//! assert_eq!(config.content_extension(), "txt");
//! assert!(config.uuids());
//! assert!(config.locking());
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Content storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ContentConfig {
    /// Extension for content files, without the leading dot.
    content_extension: String,

    /// Whether unique identifiers are enabled. When enabled, stored `uuid`
    /// fields are nulled for non-default languages so only the default
    /// translation carries the identifier.
    uuids: bool,

    /// Whether content locking is enabled.
    locking: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            content_extension: "txt".into(),
            uuids: true,
            locking: true,
        }
    }
}

impl ContentConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the content file extension.
    pub fn with_content_extension(
        mut self,
        extension: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        self.content_extension = extension.into();
        self.validate()?;
        Ok(self)
    }

    /// Enable or disable unique identifiers.
    pub fn with_uuids(mut self, uuids: bool) -> Self {
        self.uuids = uuids;
        self
    }

    /// Enable or disable content locking.
    pub fn with_locking(mut self, locking: bool) -> Self {
        self.locking = locking;
        self
    }

    /// Load configuration from a TOML file.
    ///
    /// A missing file is not an error; defaults are used.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content_extension.is_empty() {
            return Err(ConfigError::InvalidValue(
                "content extension cannot be empty".into(),
            ));
        }

        if self
            .content_extension
            .chars()
            .any(|c| c == '.' || c == '/' || c == '\\')
        {
            return Err(ConfigError::InvalidValue(format!(
                "content extension cannot contain separators: {}",
                self.content_extension
            )));
        }

        Ok(())
    }

    /// Get the content file extension, without the leading dot.
    pub fn content_extension(&self) -> &str {
        &self.content_extension
    }

    /// Check whether unique identifiers are enabled.
    pub fn uuids(&self) -> bool {
        self.uuids
    }

    /// Check whether content locking is enabled.
    pub fn locking(&self) -> bool {
        self.locking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let config = ContentConfig::default();
        assert_eq!(config.content_extension(), "txt");
        assert!(config.uuids());
        assert!(config.locking());
    }

    #[test]
    fn missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ContentConfig::load(&temp.path().join("missing.toml")).unwrap();
        assert_eq!(config, ContentConfig::default());
    }

    #[test]
    fn load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("content.toml");
        std::fs::write(
            &path,
            r#"
            content_extension = "md"
            uuids = false
            "#,
        )
        .unwrap();

        let config = ContentConfig::load(&path).unwrap();
        assert_eq!(config.content_extension(), "md");
        assert!(!config.uuids());
        assert!(config.locking());
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("content.toml");
        std::fs::write(&path, "unknown = true").unwrap();

        assert!(matches!(
            ContentConfig::load(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn invalid_extension_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("content.toml");
        std::fs::write(&path, "content_extension = \"\"").unwrap();
        assert!(matches!(
            ContentConfig::load(&path),
            Err(ConfigError::InvalidValue(_))
        ));

        assert!(ContentConfig::new().with_content_extension("a.b").is_err());
        assert!(ContentConfig::new().with_content_extension("md").is_ok());
    }

    #[test]
    fn builder_flags() {
        let config = ContentConfig::new().with_uuids(false).with_locking(false);
        assert!(!config.uuids());
        assert!(!config.locking());
    }
}
