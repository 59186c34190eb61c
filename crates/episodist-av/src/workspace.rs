//! Staging workspace for in-place tag edits.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};

/// Prefix of staged copies, so stray leftovers are recognizable.
pub const STAGING_PREFIX: &str = ".episodist-";

/// A staged copy of a media file.
///
/// Edits go to the copy, which lives next to the original so that
/// [`Workspace::commit`] is a same-filesystem rename. Dropping the workspace
/// without committing deletes the copy and leaves the original untouched.
///
/// # Example
///
/// ```no_run
/// use episodist_av::Workspace;
///
/// let workspace = Workspace::stage("/tv/Show - S01E01.mkv")?;
/// // Edit workspace.staged() ...
/// workspace.commit()?;
/// # Ok::<(), episodist_av::Error>(())
/// ```
pub struct Workspace {
    original: PathBuf,
    staged: TempPath,
}

impl Workspace {
    /// Copy `original` to a hidden sibling file.
    pub fn stage<P: AsRef<Path>>(original: P) -> Result<Self> {
        let original = original.as_ref();
        if !original.is_file() {
            return Err(Error::file_not_found(original));
        }

        let dir = match original.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let suffix = original
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let staged = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(&suffix)
            .tempfile_in(&dir)
            .map_err(|e| Error::Workspace(format!("Failed to create staging file in {:?}: {}", dir, e)))?
            .into_temp_path();

        std::fs::copy(original, &staged).map_err(|e| {
            Error::Workspace(format!("Failed to copy {:?} for staging: {}", original, e))
        })?;

        tracing::debug!("Staged {:?} at {:?}", original, &*staged);

        Ok(Self {
            original: original.to_path_buf(),
            staged,
        })
    }

    /// Get the original file path.
    pub fn original(&self) -> &Path {
        &self.original
    }

    /// Get the staged copy path.
    pub fn staged(&self) -> &Path {
        &self.staged
    }

    /// Create a scratch file (outside the media directory) with the given suffix.
    pub fn scratch_file(&self, suffix: &str) -> Result<NamedTempFile> {
        tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(suffix)
            .tempfile()
            .map_err(|e| Error::Workspace(format!("Failed to create scratch file: {}", e)))
    }

    /// Replace the original with the staged copy.
    pub fn commit(self) -> Result<PathBuf> {
        let Self { original, staged } = self;
        staged.persist(&original).map_err(|e| {
            Error::Workspace(format!(
                "Failed to move staged copy over {:?}: {}",
                original, e.error
            ))
        })?;
        Ok(original)
    }

    /// Drop the staged copy without touching the original.
    pub fn discard(self) {
        drop(self.staged);
    }
}
