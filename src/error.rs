//! Error types for reference lookups.
//!
//! All errors are typed and provide root cause information. A missing
//! `go-find-references` binary is NOT an error: it is reported through
//! [`crate::tool::ToolOutput::NotInstalled`].

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for reference lookups.
#[derive(Error, Debug)]
pub enum ReferencesError {
    /// I/O error during file operations.
    #[error("I/O error for path {path}: {source}")]
    Io {
        /// The file path that caused the I/O error.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Cursor position lies outside the document.
    #[error("Invalid position {line}:{column} in {file}: document has {line_count} lines")]
    InvalidPosition {
        /// The document containing the position.
        file: PathBuf,
        /// Zero-based line of the rejected position.
        line: u32,
        /// Zero-based column of the rejected position.
        column: u32,
        /// Number of lines in the document.
        line_count: usize,
    },

    /// The reference tool could not be run (other than being absent).
    #[error("Failed to run {program}: {source}")]
    ToolFailed {
        /// The executable that failed.
        program: PathBuf,
        /// The underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The reference tool printed output that does not follow its line-pair shape.
    #[error("Malformed tool output at line {line_number} ({line:?}): {reason}")]
    MalformedOutput {
        /// 1-based line number within the tool's stdout.
        line_number: usize,
        /// The offending line.
        line: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Saving dirty documents failed.
    #[error("Failed to save workspace: {0}")]
    SaveFailed(String),

    /// UTF-8 validation error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Generic error with context.
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for ReferencesError {
    fn from(err: std::io::Error) -> Self {
        ReferencesError::Io {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl ReferencesError {
    /// Wrap an I/O error with the path it concerns.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        ReferencesError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Stable identifier used in JSON error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            ReferencesError::Io { .. } => "Io",
            ReferencesError::InvalidPosition { .. } => "InvalidPosition",
            ReferencesError::ToolFailed { .. } => "ToolFailed",
            ReferencesError::MalformedOutput { .. } => "MalformedOutput",
            ReferencesError::SaveFailed(_) => "SaveFailed",
            ReferencesError::Utf8(_) => "Utf8",
            ReferencesError::Other(_) => "Other",
        }
    }

    /// File associated with the error, if any.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            ReferencesError::Io { path, .. } => Some(path.as_path()),
            ReferencesError::InvalidPosition { file, .. } => Some(file.as_path()),
            ReferencesError::ToolFailed { program, .. } => Some(program.as_path()),
            _ => None,
        }
    }

    /// Remediation hint for the user, if one is known.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ReferencesError::InvalidPosition { .. } => {
                Some("Lines and columns are zero-based")
            }
            ReferencesError::ToolFailed { .. } => {
                Some("Check that go-find-references is executable")
            }
            ReferencesError::MalformedOutput { .. } => {
                Some("Retry with --lenient to skip unrecognised output lines")
            }
            _ => None,
        }
    }
}

/// Result type alias for reference lookups.
pub type Result<T> = std::result::Result<T, ReferencesError>;
