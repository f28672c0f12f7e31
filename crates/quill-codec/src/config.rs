#![forbid(unsafe_code)]

//! Codec configuration.

use serde::{Deserialize, Serialize};

/// Default nesting limit for encoded documents.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Tunables for the array codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Maximum number of nested schema levels, counting the top-level object.
    pub max_depth: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CodecConfig {
    /// Create a configuration with the given nesting limit.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }.validated()
    }

    /// Load config from environment variables.
    ///
    /// Reads:
    /// - `QUILL_CODEC_MAX_DEPTH`: nesting limit
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
        let mut config = Self::default();
        if let Some(val) = get_env("QUILL_CODEC_MAX_DEPTH")
            && let Ok(depth) = val.trim().parse::<usize>()
        {
            config.max_depth = depth;
        }
        config.validated()
    }

    /// Clamp values to usable ranges (`max_depth >= 1`).
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.max_depth = self.max_depth.max(1);
        self
    }
}
