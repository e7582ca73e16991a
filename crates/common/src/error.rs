//! Error types shared across Repsense crates.

use std::path::PathBuf;

/// Top-level error type for Repsense operations.
#[derive(Debug, thiserror::Error)]
pub enum RepsenseError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Frame stream error: {message}")]
    Frame { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using RepsenseError.
pub type RepsenseResult<T> = Result<T, RepsenseError>;

impl RepsenseError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn frame(msg: impl Into<String>) -> Self {
        Self::Frame {
            message: msg.into(),
        }
    }
}
