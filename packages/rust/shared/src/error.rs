//! Error types for pressmill.
//!
//! Library crates use [`PressmillError`] via `thiserror`.
//! The CLI app wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all pressmill operations.
#[derive(Debug, thiserror::Error)]
pub enum PressmillError {
    /// Malformed request: unsupported output kind, bad params, non-text input.
    /// Raised synchronously before any pipeline work starts.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// One input file could not be normalized into articles.
    #[error("parse error in '{file}': {message}")]
    Parse { file: String, message: String },

    /// One renderer failed for one output kind.
    #[error("render error for '{kind}': {message}")]
    Render { kind: String, message: String },

    /// The statistics aggregator failed; fatal to every statistics-dependent
    /// output of the run, but not to direct outputs.
    #[error("aggregation error: {0}")]
    Aggregation(String),

    /// Archive packing or unpacking error.
    #[error("archive error: {0}")]
    Archive(String),

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PressmillError>;

impl PressmillError {
    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a parse error naming the offending input file.
    pub fn parse(file: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            message: msg.into(),
        }
    }

    /// Create a render error tagged with the offending output kind.
    pub fn render(kind: impl std::fmt::Display, msg: impl Into<String>) -> Self {
        Self::Render {
            kind: kind.to_string(),
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
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
}
