//! Documents handed to the reference finder by the editor host.
//!
//! The host owns the buffers; this module only needs read access to a
//! document's path and text. [`TextDocument`] is the in-memory implementation
//! used by the CLI and by tests.

pub mod position;

use crate::error::{ReferencesError, Result};
use ropey::Rope;
use std::path::{Path, PathBuf};

pub use position::{offset_at, word_range_at, OffsetEncoding, Position, Range};

/// An open document as seen by the reference finder.
pub trait Document {
    /// Absolute path of the file backing the document.
    fn path(&self) -> &Path;

    /// Current contents, including unsaved edits.
    fn text(&self) -> &Rope;

    /// Range of the word under `position`, if the cursor touches one.
    fn word_range_at(&self, position: Position) -> Option<Range> {
        position::word_range_at(self.text(), position)
    }

    /// Offset of `position` from the start of the document.
    fn offset_at(&self, position: Position, encoding: OffsetEncoding) -> Result<usize> {
        position::offset_at(self.text(), position, encoding).ok_or_else(|| {
            ReferencesError::InvalidPosition {
                file: self.path().to_path_buf(),
                line: position.line,
                column: position.column,
                line_count: self.text().len_lines(),
            }
        })
    }
}

/// Document held entirely in memory.
#[derive(Debug, Clone)]
pub struct TextDocument {
    path: PathBuf,
    text: Rope,
}

impl TextDocument {
    /// Create a document from a path and its contents.
    pub fn new(path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            path: path.into(),
            text: Rope::from_str(text),
        }
    }

    /// Load a document from disk.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let bytes = std::fs::read(&path).map_err(|e| ReferencesError::io(&path, e))?;
        let text = std::str::from_utf8(&bytes)?;
        Ok(Self::new(path, text))
    }
}

impl Document for TextDocument {
    fn path(&self) -> &Path {
        &self.path
    }

    fn text(&self) -> &Rope {
        &self.text
    }
}
