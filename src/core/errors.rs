//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for commitmap operations
#[derive(Debug, Error)]
pub enum Error {
    /// Input records that are structurally invalid (malformed JSON,
    /// non-array top level)
    #[error("Invalid input in {path}: {message}")]
    InvalidInput { path: PathBuf, message: String },

    /// Lookup-style helpers that miss
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid-input error with path context
    pub fn invalid_input(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a not-found error for a lookup helper
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
