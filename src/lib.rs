//! go-references: "find references" for Go source files.
//!
//! This library wires an editor's find-references request to the external
//! `go-find-references` tool and maps its output back to editor ranges.
//! All semantic analysis is done by the tool.

#![warn(missing_docs)]
// env_logger is used by src/main.rs (binary), not this library
#![expect(unused_crate_dependencies)]

pub mod cli;
pub mod document;
pub mod error;
pub mod references;
pub mod tool;
pub mod workspace;

/// Re-export common error types for convenience.
pub use error::{ReferencesError, Result};

/// Re-export the finder for convenience.
pub use references::{Reference, ReferenceFinder, ReferenceRequest};

/// go-references version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
