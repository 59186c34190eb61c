//! Matroska tag editing through MKVToolNix.
//!
//! Writes run `mkvpropedit` against a staged copy; reads run
//! `mkvextract <file> tags -` and parse the XML on stdout.
//!
//! `--tags global:` replaces every global tag in the file. When `mkvextract`
//! is available the existing global `<Simple>` entries we do not own are read
//! first and written back beside ours; nested children and tags bound to a
//! chapter, edition or attachment UID are not carried over. Without
//! `mkvextract` the global tags are replaced outright.

use super::{ensure_kind, mkv_tags, MetadataEditor};
use crate::command::{CommandRunner, SystemRunner, ToolCommand};
use crate::tools::{MkvToolnix, MKVEXTRACT};
use crate::{Error, Result, Workspace};
use episodist_common::{ContainerKind, MediaFile, MediaMetadata, TagSnapshot};
use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Exit codes MKVToolNix uses for success and success-with-warnings.
const MKVTOOLNIX_OK: &[i32] = &[0, 1];

/// Editor for `.mkv` files.
pub struct MatroskaEditor {
    tools: MkvToolnix,
    runner: Arc<dyn CommandRunner>,
}

impl MatroskaEditor {
    /// Editor spawning the real tools.
    pub fn new(tools: MkvToolnix) -> Self {
        Self::with_runner(tools, Arc::new(SystemRunner))
    }

    /// Editor executing tool commands through `runner`.
    pub fn with_runner(tools: MkvToolnix, runner: Arc<dyn CommandRunner>) -> Self {
        Self { tools, runner }
    }

    fn extract_xml(&self, path: &Path) -> Result<String> {
        let extract = self.tools.require_extract()?;
        let mut cmd = ToolCommand::new(extract);
        cmd.arg(path).arg("tags").arg("-");

        let output = cmd.execute_accepting(self.runner.as_ref(), MKVTOOLNIX_OK)?;
        Ok(output.stdout)
    }

    fn extract_tags(&self, path: &Path) -> Result<TagSnapshot> {
        mkv_tags::parse(&self.extract_xml(path)?)
    }

    fn write_staged(&self, file: &MediaFile, metadata: &MediaMetadata) -> Result<()> {
        let propedit = self.tools.require_propedit()?;
        let workspace = Workspace::stage(&file.path)?;

        let foreign = if self.tools.extract.is_some() {
            mkv_tags::foreign_simples(&self.extract_xml(workspace.staged())?)?
        } else {
            tracing::debug!(
                "{} unavailable, replacing global tags of {:?}",
                MKVEXTRACT,
                file.path
            );
            Vec::new()
        };

        let mut tags_file = workspace.scratch_file(".xml")?;
        tags_file.write_all(mkv_tags::render_merged(metadata, &foreign).as_bytes())?;
        tags_file.flush()?;

        let mut title_arg = OsString::from("title=");
        title_arg.push(&metadata.episode_title);
        let mut tags_arg = OsString::from("global:");
        tags_arg.push(tags_file.path());

        let mut cmd = ToolCommand::new(propedit);
        cmd.arg(workspace.staged())
            .args(["--edit", "info", "--set"])
            .arg(&title_arg)
            .arg("--tags")
            .arg(&tags_arg);
        cmd.execute_accepting(self.runner.as_ref(), MKVTOOLNIX_OK)?;

        if self.tools.extract.is_some() {
            let written = self.extract_tags(workspace.staged())?;
            if !written.matches(metadata) {
                return Err(Error::Verification(format!(
                    "tags read back as {:?}",
                    written
                )));
            }
        } else {
            tracing::debug!(
                "{} unavailable, trusting mkvpropedit exit status for {:?}",
                MKVEXTRACT,
                file.path
            );
        }

        workspace.commit()?;
        Ok(())
    }
}

impl MetadataEditor for MatroskaEditor {
    fn container(&self) -> ContainerKind {
        ContainerKind::Matroska
    }

    fn ensure_available(&self) -> episodist_common::Result<()> {
        self.tools
            .require_propedit()
            .map(|_| ())
            .map_err(|e| match e {
                Error::ToolNotFound { tool } => episodist_common::Error::tool_not_found(tool),
                other => episodist_common::Error::config(other.to_string()),
            })
    }

    fn read(&self, path: &Path) -> episodist_common::Result<TagSnapshot> {
        if !path.is_file() {
            return Err(episodist_common::Error::metadata_read(
                path,
                Error::file_not_found(path),
            ));
        }
        self.extract_tags(path)
            .map_err(|e| episodist_common::Error::metadata_read(path, e))
    }

    fn write(&self, file: &MediaFile, metadata: &MediaMetadata) -> episodist_common::Result<()> {
        ensure_kind(self, file)?;
        self.write_staged(file, metadata)
            .map_err(|e| episodist_common::Error::metadata_write(&file.path, e))?;
        tracing::debug!("Wrote Matroska tags to {:?}", file.path);
        Ok(())
    }
}
