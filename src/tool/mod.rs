//! Locating and running the external `go-find-references` tool.
//!
//! The tool does all of the semantic work; this module only builds its
//! command line and hands back what it printed. An absent binary is an
//! expected condition and is reported as [`ToolOutput::NotInstalled`]
//! rather than as an error.

pub mod decode;

use crate::document::OffsetEncoding;
use crate::error::{ReferencesError, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;
use which::which;

pub use decode::{decode_output, parse_location, DecodeMode, ToolMatch};

/// Executable name of the reference search tool.
pub const TOOL_NAME: &str = "go-find-references";

/// Notice shown to the user when the tool is not installed.
pub const INSTALL_NOTICE: &str = "The 'go-find-references' command is not available.  \
     Use 'go get -v github.com/lukehoban/go-find-references' to install.";

/// Environment variable naming the Go toolchain root.
pub const TOOLCHAIN_ROOT_VAR: &str = "GOPATH";

/// Settings for running the reference tool.
#[derive(Debug, Clone, Default)]
pub struct ToolConfig {
    /// Directory whose `bin/` holds the tool. `None` falls back to `PATH`.
    pub toolchain_root: Option<PathBuf>,

    /// Unit used for the `-offset` argument.
    pub offset_encoding: OffsetEncoding,

    /// How strictly the tool's output is decoded.
    pub decode_mode: DecodeMode,
}

impl ToolConfig {
    /// Configuration with an explicit toolchain root.
    pub fn new(toolchain_root: impl Into<PathBuf>) -> Self {
        Self {
            toolchain_root: Some(toolchain_root.into()),
            ..Self::default()
        }
    }

    /// Configuration taken from the `GOPATH` environment variable.
    pub fn from_env() -> Self {
        Self::from_gopath(std::env::var_os(TOOLCHAIN_ROOT_VAR).as_deref())
    }

    /// Configuration from a `GOPATH`-style value.
    ///
    /// When the value lists several directories the first non-empty one wins,
    /// matching where `go get` installs binaries.
    pub fn from_gopath(value: Option<&OsStr>) -> Self {
        let toolchain_root =
            value.and_then(|v| std::env::split_paths(v).find(|p| !p.as_os_str().is_empty()));
        Self {
            toolchain_root,
            ..Self::default()
        }
    }

    /// Set the offset unit.
    pub fn with_offset_encoding(mut self, encoding: OffsetEncoding) -> Self {
        self.offset_encoding = encoding;
        self
    }

    /// Set the output decoding mode.
    pub fn with_decode_mode(mut self, mode: DecodeMode) -> Self {
        self.decode_mode = mode;
        self
    }

    /// Path of the tool executable.
    ///
    /// `<root>/bin/go-find-references` when a root is configured, otherwise
    /// whatever `PATH` resolves, otherwise the bare name (which then fails to
    /// spawn with "not found").
    pub fn executable_path(&self) -> PathBuf {
        match &self.toolchain_root {
            Some(root) => root
                .join("bin")
                .join(format!("{}{}", TOOL_NAME, std::env::consts::EXE_SUFFIX)),
            None => which(TOOL_NAME).unwrap_or_else(|_| PathBuf::from(TOOL_NAME)),
        }
    }
}

/// Arguments for one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// File containing the cursor, already canonicalized.
    pub file: String,
    /// Cursor offset within `file`.
    pub offset: usize,
    /// Workspace root.
    pub root: PathBuf,
}

/// What a tool invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutput {
    /// The tool ran; this is its stdout.
    Stdout(String),
    /// The tool is not installed.
    NotInstalled,
}

/// Something that can search for references.
pub trait ReferenceTool {
    /// Run one search.
    fn search(&self, query: &SearchQuery) -> Result<ToolOutput>;
}

/// The `go-find-references` subprocess.
#[derive(Debug, Clone)]
pub struct GoFindReferences {
    program: PathBuf,
}

impl GoFindReferences {
    /// Run the executable at `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run the executable located by `config`.
    pub fn from_config(config: &ToolConfig) -> Self {
        Self::new(config.executable_path())
    }

    /// Path of the executable this runner spawns.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl ReferenceTool for GoFindReferences {
    fn search(&self, query: &SearchQuery) -> Result<ToolOutput> {
        log::debug!(
            "Running {} -file {} -offset {} -root {}",
            self.program.display(),
            query.file,
            query.offset,
            query.root.display()
        );

        let output = Command::new(&self.program)
            .arg("-file")
            .arg(&query.file)
            .arg("-offset")
            .arg(query.offset.to_string())
            .arg("-root")
            .arg(&query.root)
            .output();

        match output {
            Ok(result) => {
                // The exit status is not part of the tool's contract; whatever
                // it printed is still decoded.
                if !result.status.success() {
                    log::warn!(
                        "{} exited with {}: {}",
                        TOOL_NAME,
                        result.status,
                        String::from_utf8_lossy(&result.stderr).trim()
                    );
                }
                Ok(ToolOutput::Stdout(
                    String::from_utf8_lossy(&result.stdout).into_owned(),
                ))
            }
            Err(e) => {
                if e.kind() == std::io::ErrorKind::NotFound {
                    log::debug!("{} not found at {}", TOOL_NAME, self.program.display());
                    return Ok(ToolOutput::NotInstalled);
                }
                Err(ReferencesError::ToolFailed {
                    program: self.program.clone(),
                    source: e,
                })
            }
        }
    }
}

/// Convert backslashes to forward slashes in Windows drive paths.
///
/// `go-find-references` returns no matches for `C:\...` style paths.
/// Anything not starting with a drive letter, `:` and `\` is returned as is.
pub fn canonicalize_for_windows(path: &str) -> String {
    let bytes = path.as_bytes();
    let is_drive_path = bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && bytes[2] == b'\\';

    if is_drive_path {
        path.replace('\\', "/")
    } else {
        path.to_string()
    }
}
