//! Error types for allocation runs.

use crate::collection::Phase;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, AllocError>;

/// Errors raised while configuring, loading, allocating or running hooks
#[derive(Debug, Error)]
pub enum AllocError {
    /// A required setting (root, source, allocator) is missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The level source could not be read or parsed
    #[error("Unable to open {path:?}: {reason}")]
    Open { path: PathBuf, reason: String },

    /// Enumeration could not produce a valid distribution
    #[error("Allocation error: {0}")]
    Allocation(String),

    /// A hook, per-handle call or statistics function failed
    #[error("{phase} hook failed: {message}")]
    Hook { phase: Phase, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AllocError {
    pub(crate) fn open(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        AllocError::Open {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn hook(phase: Phase, err: anyhow::Error) -> Self {
        AllocError::Hook {
            phase,
            message: format!("{:#}", err),
        }
    }
}

impl From<config::ConfigError> for AllocError {
    fn from(err: config::ConfigError) -> Self {
        AllocError::Configuration(err.to_string())
    }
}
