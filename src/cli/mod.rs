//! Command-line interface for go-references.
//!
//! This module handles argument parsing and output payloads only.
//! NO reference finding is performed here.

use crate::document::{OffsetEncoding, Range};
use crate::references::Reference;
use crate::tool::DecodeMode;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

/// go-references: find references to Go identifiers with go-find-references.
#[derive(Parser, Debug)]
#[command(name = "go-references")]
#[command(author, version, about, long_about = None)]
#[command(subcommand_required = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Find references to the identifier at a position.
    Find {
        /// Go source file containing the cursor.
        #[arg(short, long)]
        file: PathBuf,

        /// Cursor line (0-based).
        #[arg(short, long)]
        line: u32,

        /// Cursor column (0-based).
        #[arg(short, long)]
        column: u32,

        /// Workspace root (defaults to the current directory).
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Toolchain root holding bin/go-find-references (defaults to $GOPATH).
        #[arg(long, value_name = "DIR")]
        gopath: Option<PathBuf>,

        /// Pass the cursor offset in UTF-8 bytes instead of characters.
        #[arg(long)]
        byte_offsets: bool,

        /// Skip output lines that do not follow the expected pairing instead of failing.
        #[arg(long)]
        lenient: bool,

        /// Include the declaration (accepted for editor parity; has no effect).
        #[arg(long)]
        include_declaration: bool,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the offset that would be passed to the tool.
    Offset {
        /// Go source file containing the cursor.
        #[arg(short, long)]
        file: PathBuf,

        /// Cursor line (0-based).
        #[arg(short, long)]
        line: u32,

        /// Cursor column (0-based).
        #[arg(short, long)]
        column: u32,

        /// Count UTF-8 bytes instead of characters.
        #[arg(long)]
        byte_offsets: bool,
    },
}

/// Offset unit selected by the `--byte-offsets` flag.
pub fn offset_encoding(byte_offsets: bool) -> OffsetEncoding {
    if byte_offsets {
        OffsetEncoding::Bytes
    } else {
        OffsetEncoding::Chars
    }
}

/// Decode mode selected by the `--lenient` flag.
pub fn decode_mode(lenient: bool) -> DecodeMode {
    if lenient {
        DecodeMode::Lenient
    } else {
        DecodeMode::Strict
    }
}

/// Parse command-line arguments.
///
/// Returns the parsed Cli struct or exits on error.
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Format a reference as `path:line:column-endcolumn`.
pub fn format_reference(reference: &Reference) -> String {
    format!(
        "{}:{}:{}-{}",
        reference.path.display(),
        reference.range.start.line,
        reference.range.start.column,
        reference.range.end.column
    )
}

/// JSON success payload for `find`.
#[derive(Serialize)]
pub struct ReferencesPayload {
    /// Status indicator ("ok").
    pub status: &'static str,
    /// References found, or `null` when the tool is not installed.
    pub references: Option<Vec<ReferencePayload>>,
}

impl ReferencesPayload {
    /// Build the payload from a finder result.
    pub fn new(references: Option<Vec<Reference>>) -> Self {
        Self {
            status: "ok",
            references: references
                .map(|refs| refs.into_iter().map(ReferencePayload::from).collect()),
        }
    }
}

/// JSON representation of one reference.
#[derive(Serialize)]
pub struct ReferencePayload {
    /// File path.
    pub path: String,
    /// `file://` URI, when the path is absolute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Span of the reference.
    pub range: Range,
}

impl From<Reference> for ReferencePayload {
    fn from(reference: Reference) -> Self {
        ReferencePayload {
            uri: reference.uri().map(|u| u.to_string()),
            path: reference.path.to_string_lossy().to_string(),
            range: reference.range,
        }
    }
}

/// JSON error payload for CLI responses.
#[derive(Serialize)]
pub struct CliErrorPayload {
    /// Status indicator ("error").
    pub status: &'static str,
    /// Structured error details.
    pub error: ErrorDetails,
}

/// Details for a CLI error payload.
#[derive(Serialize)]
pub struct ErrorDetails {
    /// Error kind identifier (MalformedOutput, etc.).
    pub kind: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Optional file context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Optional hint for remediation steps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl CliErrorPayload {
    /// Build payload from a ReferencesError instance.
    pub fn from_error(error: &crate::ReferencesError) -> Self {
        CliErrorPayload {
            status: "error",
            error: ErrorDetails {
                kind: error.kind(),
                message: error.to_string(),
                file: error
                    .file_path()
                    .map(|path| path.to_string_lossy().to_string()),
                hint: error.hint().map(|h| h.to_string()),
            },
        }
    }
}
