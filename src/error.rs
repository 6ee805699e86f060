//! Error types reported by hosts and by settings loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::position::Position;

/// Reasons a host refuses a command or an edit transaction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The document cannot be modified.
    #[error("document is read-only")]
    ReadOnly,

    /// Two edits of one transaction touch the same text.
    #[error("overlapping ranges are not allowed")]
    OverlappingEdits,

    /// An edit addresses text that does not exist.
    #[error("position {}:{} is outside the document", .0.line + 1, .0.column + 1)]
    InvalidPosition(Position),

    /// A command needed a focused editor and none was focused.
    #[error("no active editor")]
    NoActiveEditor,
}

/// Errors that can occur when loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error reading a settings file.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// Path to the file that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Error parsing TOML settings.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}
