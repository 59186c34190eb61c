//! Container tag editors.
//!
//! Each container kind has one [`MetadataEditor`]. [`Editors`] picks the
//! editor from the file's [`ContainerKind`], never from its bytes.

pub mod matroska;
pub mod mkv_tags;
pub mod mp4;

pub use matroska::MatroskaEditor;
pub use mp4::{AtomStore, Mp4Editor, Mp4TagStore};

use crate::tools::MkvToolnix;
use episodist_common::{ContainerKind, MediaFile, MediaMetadata, TagSnapshot};
use std::path::Path;

/// Reads and writes the normalized tag set of one container kind.
///
/// Errors use the common taxonomy: a failed write is
/// [`MetadataWrite`](episodist_common::Error::MetadataWrite) and leaves the
/// file unmodified.
pub trait MetadataEditor: Send + Sync {
    /// Container kind this editor handles.
    fn container(&self) -> ContainerKind;

    /// Check that external dependencies are present before a batch starts.
    fn ensure_available(&self) -> episodist_common::Result<()> {
        Ok(())
    }

    /// Read the tags currently stored in `path`.
    fn read(&self, path: &Path) -> episodist_common::Result<TagSnapshot>;

    /// Write `metadata` into `file`.
    fn write(&self, file: &MediaFile, metadata: &MediaMetadata) -> episodist_common::Result<()>;
}

/// Reject files of a kind `editor` does not handle.
pub(crate) fn ensure_kind(
    editor: &dyn MetadataEditor,
    file: &MediaFile,
) -> episodist_common::Result<()> {
    if file.container == editor.container() {
        Ok(())
    } else {
        Err(episodist_common::Error::unsupported(&file.path, file.container))
    }
}

/// Editor registry keyed by container kind.
pub struct Editors {
    mp4: Box<dyn MetadataEditor>,
    matroska: Box<dyn MetadataEditor>,
}

impl Editors {
    pub fn new(mp4: Box<dyn MetadataEditor>, matroska: Box<dyn MetadataEditor>) -> Self {
        Self { mp4, matroska }
    }

    /// Real editors: `mp4ameta` for MP4, MKVToolNix through [`SystemRunner`](crate::SystemRunner).
    pub fn system(tools: &MkvToolnix) -> Self {
        Self::new(
            Box::new(Mp4Editor::new()),
            Box::new(MatroskaEditor::new(tools.clone())),
        )
    }

    /// Editor for a container kind.
    pub fn for_kind(&self, kind: ContainerKind) -> Option<&dyn MetadataEditor> {
        match kind {
            ContainerKind::Mp4 => Some(self.mp4.as_ref()),
            ContainerKind::Matroska => Some(self.matroska.as_ref()),
            ContainerKind::Other => None,
        }
    }

    /// Editor for a file, or `UnsupportedFormat`.
    pub fn for_file(&self, file: &MediaFile) -> episodist_common::Result<&dyn MetadataEditor> {
        self.for_kind(file.container)
            .ok_or_else(|| episodist_common::Error::unsupported(&file.path, file.container))
    }

    /// Read tags from any supported path.
    pub fn read(&self, path: &Path) -> episodist_common::Result<TagSnapshot> {
        let kind = episodist_common::paths::container_kind(path);
        let editor = self
            .for_kind(kind)
            .ok_or_else(|| episodist_common::Error::unsupported(path, kind))?;
        editor.read(path)
    }
}
