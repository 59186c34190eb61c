//! MP4 tag editing through the in-process `mp4ameta` atom library.

use super::{ensure_kind, MetadataEditor};
use crate::{Error, Result, Workspace};
use episodist_common::{parse_year, ContainerKind, MediaFile, MediaMetadata, TagSnapshot};
use mp4ameta::{MediaType, Tag};
use std::path::Path;

/// Low-level access to MP4 metadata atoms.
pub trait Mp4TagStore: Send + Sync {
    /// Read the normalized keys from `path`.
    fn read(&self, path: &Path) -> Result<TagSnapshot>;

    /// Set the normalized keys in `path`, preserving every other atom.
    fn write(&self, path: &Path, metadata: &MediaMetadata) -> Result<()>;
}

/// [`Mp4TagStore`] backed by `mp4ameta`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomStore;

impl Mp4TagStore for AtomStore {
    fn read(&self, path: &Path) -> Result<TagSnapshot> {
        let tag = Tag::read_from_path(path)?;
        Ok(TagSnapshot {
            title: tag.title().map(str::to_string),
            show: tag.tv_show_name().map(str::to_string),
            genre: tag.genre().map(str::to_string),
            year: tag.year().and_then(parse_year),
            season: tag.tv_season(),
            episode: tag.tv_episode(),
        })
    }

    fn write(&self, path: &Path, metadata: &MediaMetadata) -> Result<()> {
        let mut tag = Tag::read_from_path(path)?;
        tag.set_title(metadata.episode_title.as_str());
        tag.set_tv_show_name(metadata.title.as_str());
        tag.set_genre(metadata.genre.label());
        tag.set_year(metadata.year.to_string());
        tag.set_tv_season(metadata.season);
        tag.set_tv_episode(metadata.episode);
        tag.set_media_type(MediaType::TvShow);
        tag.write_to_path(path)?;
        Ok(())
    }
}

/// Editor for `.mp4`/`.m4v` files.
pub struct Mp4Editor {
    store: Box<dyn Mp4TagStore>,
}

impl Default for Mp4Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Mp4Editor {
    /// Editor using [`AtomStore`].
    pub fn new() -> Self {
        Self::with_store(Box::new(AtomStore))
    }

    /// Editor using a custom tag store.
    pub fn with_store(store: Box<dyn Mp4TagStore>) -> Self {
        Self { store }
    }

    fn write_staged(&self, file: &MediaFile, metadata: &MediaMetadata) -> Result<()> {
        let workspace = Workspace::stage(&file.path)?;
        self.store.write(workspace.staged(), metadata)?;

        let written = self.store.read(workspace.staged())?;
        if !written.matches(metadata) {
            return Err(Error::Verification(format!(
                "tags read back as {:?}",
                written
            )));
        }

        workspace.commit()?;
        Ok(())
    }
}

impl MetadataEditor for Mp4Editor {
    fn container(&self) -> ContainerKind {
        ContainerKind::Mp4
    }

    fn read(&self, path: &Path) -> episodist_common::Result<TagSnapshot> {
        self.store
            .read(path)
            .map_err(|e| episodist_common::Error::metadata_read(path, e))
    }

    fn write(&self, file: &MediaFile, metadata: &MediaMetadata) -> episodist_common::Result<()> {
        ensure_kind(self, file)?;
        self.write_staged(file, metadata)
            .map_err(|e| episodist_common::Error::metadata_write(&file.path, e))?;
        tracing::debug!("Wrote MP4 tags to {:?}", file.path);
        Ok(())
    }
}
