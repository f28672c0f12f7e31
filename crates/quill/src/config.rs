#![forbid(unsafe_code)]

//! Workspace-wide configuration.
//!
//! [`QuillConfig`] groups the history and codec tunables so a host can load
//! them from one file at startup.
//!
//! ```toml
//! # quill.toml
//! [history]
//! max_depth = 250
//!
//! [codec]
//! max_depth = 32
//! ```
//!
//! ```rust,ignore
//! let config = QuillConfig::from_toml_file("quill.toml")?.checked()?;
//! ```
//!
//! Missing sections and keys fall back to their defaults.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use quill_codec::CodecConfig;
use quill_history::HistoryConfig;

/// Top-level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct QuillConfig {
    /// Undo history limits.
    pub history: HistoryConfig,
    /// Codec limits.
    pub codec: CodecConfig,
}

impl QuillConfig {
    /// Load config from environment variables.
    ///
    /// Reads `QUILL_UNDO_MAX_DEPTH` and `QUILL_CODEC_MAX_DEPTH`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load config using a custom environment lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            history: HistoryConfig::from_env_with(&get_env),
            codec: CodecConfig::from_env_with(&get_env),
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.history.max_depth == 0 {
            errors.push("history.max_depth must be > 0".into());
        }
        if self.codec.max_depth == 0 {
            errors.push("codec.max_depth must be > 0".into());
        }
        errors
    }

    /// Return `self` if [`validate`](Self::validate) finds nothing.
    pub fn checked(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors that can occur when loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_validates_clean() {
        let errors = QuillConfig::default().validate();
        assert!(errors.is_empty(), "default should validate: {errors:?}");
    }

    #[test]
    fn validate_catches_zero_depths() {
        let mut config = QuillConfig::default();
        config.history.max_depth = 0;
        config.codec.max_depth = 0;
        let errors = config.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("history.max_depth")));

        let err = config.checked().unwrap_err();
        assert!(err.to_string().starts_with("validation errors:"));
    }

    #[test]
    fn env_reads_both_sections() {
        let config = QuillConfig::from_env_with(|key| match key {
            "QUILL_UNDO_MAX_DEPTH" => Some("7".into()),
            "QUILL_CODEC_MAX_DEPTH" => Some("9".into()),
            _ => None,
        });
        assert_eq!(config.history.max_depth, 7);
        assert_eq!(config.codec.max_depth, 9);
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_partial_uses_defaults() {
        let config = QuillConfig::from_toml_str("[history]\nmax_depth = 250\n").unwrap();
        assert_eq!(config.history.max_depth, 250);
        assert_eq!(config.codec, CodecConfig::default());
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_round_trip() {
        let config = QuillConfig {
            history: HistoryConfig::new(12),
            codec: CodecConfig::new(5),
        };
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(QuillConfig::from_json_str(&text).unwrap(), config);
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill.toml");
        std::fs::write(&path, "[codec]\nmax_depth = 16\n").unwrap();
        let config = QuillConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.codec.max_depth, 16);
    }

    #[cfg(feature = "config")]
    #[test]
    fn missing_file_is_io_error() {
        let err = QuillConfig::from_json_file("/nonexistent/quill.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[cfg(feature = "config")]
    #[test]
    fn bad_toml_is_reported() {
        let err = QuillConfig::from_toml_str("[history\n").unwrap_err();
        assert!(err.to_string().starts_with("TOML parse error"));
    }
}
