//! Error types for DocReview.
//!
//! Library crates use [`DocReviewError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all DocReview operations.
#[derive(Debug, thiserror::Error)]
pub enum DocReviewError {
    /// Configuration loading or credential resolution error. Fatal.
    #[error("config error: {message}")]
    Config { message: String },

    /// An HTTP request exceeded its timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Network/HTTP error (DNS, connection, non-2xx status).
    #[error("network error: {0}")]
    Network(String),

    /// HTML or JSON parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// LLM API-level failure (status, auth, malformed response).
    #[error("llm error: {0}")]
    Llm(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (malformed interchange file, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocReviewError>;

impl DocReviewError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is the JSON/HTML parse variant.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
