//! Reference finding backed by `go-find-references`.
//!
//! # Flow
//! 1. Save dirty documents (best effort, before the search starts)
//! 2. Compute the cursor offset in the document
//! 3. Run the tool with `-file`, `-offset` and `-root`
//! 4. Decode its output and map each match to a range as wide as the word
//!    under the original cursor
//!
//! Line and column numbers printed by the tool are carried into the returned
//! ranges unchanged.

use crate::document::{Document, Position, Range};
use crate::error::Result;
use crate::tool::{
    canonicalize_for_windows, decode_output, GoFindReferences, ReferenceTool, SearchQuery,
    ToolConfig, ToolOutput, INSTALL_NOTICE,
};
use crate::workspace::Workspace;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use url::Url;

/// One occurrence of the symbol under the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// File containing the occurrence.
    pub path: PathBuf,

    /// Span of the occurrence.
    pub range: Range,
}

impl Reference {
    /// `file://` URI of the referenced file, if the path is absolute.
    pub fn uri(&self) -> Option<Url> {
        Url::from_file_path(&self.path).ok()
    }
}

/// A "find references" request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceRequest {
    /// Cursor position in the document.
    pub position: Position,

    /// Whether the declaration itself should be listed. The tool has no such
    /// switch, so this does not change the result.
    pub include_declaration: bool,
}

impl ReferenceRequest {
    /// Request for references at `position`.
    pub fn at(position: Position) -> Self {
        Self {
            position,
            include_declaration: true,
        }
    }
}

/// Answers reference requests for one workspace.
#[derive(Debug)]
pub struct ReferenceFinder<W, T> {
    workspace: W,
    tool: T,
    config: ToolConfig,
}

impl<W: Workspace> ReferenceFinder<W, GoFindReferences> {
    /// Finder that runs the tool located by `config`.
    pub fn from_config(workspace: W, config: ToolConfig) -> Self {
        let tool = GoFindReferences::from_config(&config);
        Self::new(workspace, tool, config)
    }
}

impl<W: Workspace, T: ReferenceTool> ReferenceFinder<W, T> {
    /// Create a finder from its parts.
    pub fn new(workspace: W, tool: T, config: ToolConfig) -> Self {
        Self {
            workspace,
            tool,
            config,
        }
    }

    /// The workspace this finder serves.
    pub fn workspace(&self) -> &W {
        &self.workspace
    }

    /// The tool this finder runs.
    pub fn tool(&self) -> &T {
        &self.tool
    }

    /// Find references to the word at `request.position` in `document`.
    ///
    /// # Returns
    /// * `Ok(Some(refs))` - The tool ran; `refs` may be empty
    /// * `Ok(None)` - The tool is not installed (the user has been notified)
    /// * `Err(ReferencesError)` - Bad position, spawn failure or malformed output
    pub fn find_references<D>(
        &self,
        document: &D,
        request: &ReferenceRequest,
    ) -> Result<Option<Vec<Reference>>>
    where
        D: Document + ?Sized,
    {
        if self.workspace.any_dirty() {
            log::debug!("Saving dirty documents before searching");
            if let Err(e) = self.workspace.save_all() {
                log::warn!("Save before search failed, searching anyway: {}", e);
            }
        }

        let file = canonicalize_for_windows(&document.path().to_string_lossy());
        let source_dir = Path::new(&file)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let word_width = match document.word_range_at(request.position) {
            Some(word) => word.width(),
            None => {
                log::debug!(
                    "No word at {}:{}, references will be empty ranges",
                    request.position.line,
                    request.position.column
                );
                0
            }
        };

        let offset = document.offset_at(request.position, self.config.offset_encoding)?;

        let query = SearchQuery {
            file,
            offset,
            root: self.workspace.root().to_path_buf(),
        };

        let stdout = match self.tool.search(&query)? {
            ToolOutput::Stdout(stdout) => stdout,
            ToolOutput::NotInstalled => {
                self.workspace.show_information(INSTALL_NOTICE);
                return Ok(None);
            }
        };

        let references: Vec<Reference> = decode_output(&stdout, self.config.decode_mode)?
            .into_iter()
            .map(|found| Reference {
                path: resolve_against(&source_dir, &found.file),
                range: Range::on_line(Position::new(found.line, found.column), word_width),
            })
            .collect();

        log::debug!(
            "Found {} references from {} at offset {}",
            references.len(),
            query.file,
            query.offset
        );

        Ok(Some(references))
    }
}

/// Resolve `file` against `base` and fold `.` and `..` components.
fn resolve_against(base: &Path, file: &str) -> PathBuf {
    let joined = base.join(file);
    let mut resolved = PathBuf::new();

    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = resolved.components().next_back();
                let above_name = matches!(last, Some(Component::Normal(_)));
                let at_root = matches!(last, Some(Component::RootDir | Component::Prefix(_)));
                if above_name {
                    resolved.pop();
                } else if !at_root {
                    resolved.push("..");
                }
            }
            other => resolved.push(other.as_os_str()),
        }
    }

    resolved
}
