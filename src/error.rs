//! Error types.
//!
//! Only [`PromptError`] ever reaches a caller. [`FieldError`] lives inside
//! the readers, where every variant degrades one field to the unknown
//! placeholder.

use std::path::PathBuf;

use crate::ports::ShellError;

/// Hard failures of the prompt entry point.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// A relative start path was given and the current directory is gone.
    #[error("cannot resolve current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
    /// The start path's existence cannot be checked (e.g. permission denied).
    #[error("cannot access {}: {message}", path.display())]
    Inaccessible {
        /// The normalized start path.
        path: PathBuf,
        /// Description of the underlying failure.
        message: String,
    },
}

/// Reasons a single field could not be determined.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    /// A metadata file could not be read.
    #[error("cannot read {}: {message}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },
    /// Metadata exists but does not have the expected layout.
    #[error("malformed {what}")]
    Malformed {
        /// What was being parsed.
        what: &'static str,
    },
    /// The native client could not be run at all.
    #[error(transparent)]
    Tool(#[from] ShellError),
    /// The native client ran and exited unsuccessfully.
    #[error("{program} exited with status {code}")]
    ToolFailed {
        /// Program that failed.
        program: String,
        /// Its exit code.
        code: i32,
    },
    /// An embedded database could not be queried.
    #[error("database: {0}")]
    Database(#[from] rusqlite::Error),
}

impl FieldError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: &dyn std::fmt::Display) -> Self {
        Self::Io { path: path.into(), message: err.to_string() }
    }
}
