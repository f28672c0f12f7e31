#![forbid(unsafe_code)]

//! History limits.

/// Default number of undo steps kept.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Configuration for an [`UndoStore`](crate::UndoStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HistoryConfig {
    /// Maximum number of groups kept on the undo stack.
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl HistoryConfig {
    /// Create a configuration with a custom depth.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }.validated()
    }

    /// Create unlimited configuration (for testing).
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }

    /// Load config from environment variables.
    ///
    /// Reads:
    /// - `QUILL_UNDO_MAX_DEPTH`: undo stack depth
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
        if let Some(val) = get_env("QUILL_UNDO_MAX_DEPTH")
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
