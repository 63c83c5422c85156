//! Workspace operations provided by the editor host.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Host services the reference finder relies on.
pub trait Workspace {
    /// Root directory of the workspace, passed to the tool as `-root`.
    fn root(&self) -> &Path;

    /// Whether any open document has unsaved changes.
    fn any_dirty(&self) -> bool;

    /// Save every dirty document.
    fn save_all(&self) -> Result<()>;

    /// Show an informational message to the user.
    fn show_information(&self, message: &str);
}

/// Workspace backed directly by the file system.
///
/// Nothing is ever dirty: documents are read from disk as they are.
#[derive(Debug, Clone)]
pub struct FsWorkspace {
    root: PathBuf,
}

impl FsWorkspace {
    /// Create a workspace rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Workspace for FsWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    fn any_dirty(&self) -> bool {
        false
    }

    fn save_all(&self) -> Result<()> {
        Ok(())
    }

    fn show_information(&self, message: &str) {
        log::info!("{}", message);
        eprintln!("{}", message);
    }
}
