//! Shared fixtures for integration tests.
//!
//! Provides fake tag backends so batches run without real MP4 atoms or an
//! MKVToolNix install: [`FileTagStore`] keeps MP4 tags as a JSON trailer on
//! the file, [`FakeToolnix`] plays `mkvpropedit`/`mkvextract` by copying the
//! tags XML in and out of the target file.

#![allow(dead_code)]

use episodist::reconciler::Reconciler;
use episodist_av::command::{CommandRunner, ToolCommand, ToolOutput};
use episodist_av::{Editors, MatroskaEditor, Mp4Editor, Mp4TagStore, MkvToolnix};
use episodist_common::{Genre, MediaFile, MediaMetadata, NamingPolicy, TagSnapshot};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Separates the payload from the serialized tags.
const TAGS_MARKER: &[u8] = b"\n--episodist-test-tags--\n";

/// Payloads starting with this are rejected like a damaged container.
pub const CORRUPT: &str = "CORRUPT";

/// MP4 tag store backed by a JSON trailer.
#[derive(Debug, Default)]
pub struct FileTagStore;

fn split_tags(bytes: &[u8]) -> (&[u8], Option<&[u8]>) {
    match bytes
        .windows(TAGS_MARKER.len())
        .position(|w| w == TAGS_MARKER)
    {
        Some(pos) => (&bytes[..pos], Some(&bytes[pos + TAGS_MARKER.len()..])),
        None => (bytes, None),
    }
}

impl Mp4TagStore for FileTagStore {
    fn read(&self, path: &Path) -> episodist_av::Result<TagSnapshot> {
        let bytes = fs::read(path)?;
        let (payload, tags) = split_tags(&bytes);
        if payload.starts_with(CORRUPT.as_bytes()) {
            return Err(episodist_av::Error::Tag("no ftyp atom".to_string()));
        }
        match tags {
            Some(json) => serde_json::from_slice(json)
                .map_err(|e| episodist_av::Error::Tag(e.to_string())),
            None => Ok(TagSnapshot::default()),
        }
    }

    fn write(&self, path: &Path, metadata: &MediaMetadata) -> episodist_av::Result<()> {
        let bytes = fs::read(path)?;
        let (payload, _) = split_tags(&bytes);
        if payload.starts_with(CORRUPT.as_bytes()) {
            return Err(episodist_av::Error::Tag("no ftyp atom".to_string()));
        }
        let json = serde_json::to_vec(&TagSnapshot::from(metadata))
            .map_err(|e| episodist_av::Error::Tag(e.to_string()))?;

        let mut out = payload.to_vec();
        out.extend_from_slice(TAGS_MARKER);
        out.extend_from_slice(&json);
        fs::write(path, out)?;
        Ok(())
    }
}

/// Stand-in for the MKVToolNix binaries.
#[derive(Debug, Default)]
pub struct FakeToolnix {
    calls: Mutex<Vec<String>>,
}

impl FakeToolnix {
    /// Program names invoked so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeToolnix {
    fn run(&self, command: &ToolCommand) -> episodist_av::Result<ToolOutput> {
        let program = command.program_name();
        self.calls.lock().unwrap().push(program.clone());
        let args: Vec<String> = command
            .get_args()
            .iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect();

        match program.as_str() {
            "mkvpropedit" => {
                let target = &args[0];
                if fs::read_to_string(target)?.starts_with(CORRUPT) {
                    return Ok(ToolOutput::failed(2, "Error: not a valid Matroska file"));
                }
                let tags = args
                    .iter()
                    .find_map(|a| a.strip_prefix("global:"))
                    .expect("mkvpropedit called without --tags global:");
                fs::copy(tags, target)?;
                Ok(ToolOutput::ok("Done."))
            }
            "mkvextract" => Ok(ToolOutput::ok(fs::read_to_string(&args[0])?)),
            other => Ok(ToolOutput::failed(2, format!("unexpected program {other}"))),
        }
    }
}

/// Tool paths that are never executed (the fake runner intercepts them).
pub fn fake_toolnix_paths() -> MkvToolnix {
    MkvToolnix {
        propedit: Some(PathBuf::from("/opt/mkvtoolnix/mkvpropedit")),
        extract: Some(PathBuf::from("/opt/mkvtoolnix/mkvextract")),
    }
}

/// Editors wired to the fake backends.
pub fn fake_editors(tools: MkvToolnix, runner: Arc<FakeToolnix>) -> Editors {
    Editors::new(
        Box::new(Mp4Editor::with_store(Box::new(FileTagStore))),
        Box::new(MatroskaEditor::with_runner(tools, runner)),
    )
}

/// Reconciler over fake editors with both tools present.
pub fn reconciler() -> Reconciler {
    Reconciler::new(fake_editors(
        fake_toolnix_paths(),
        Arc::new(FakeToolnix::default()),
    ))
}

/// Write `files` (name, payload) into a fresh directory and build the batch
/// in the given order.
pub fn media_dir(files: &[(&str, &str)]) -> (TempDir, Vec<MediaFile>) {
    let dir = tempfile::tempdir().unwrap();
    let batch = files
        .iter()
        .map(|(name, payload)| {
            let path = dir.path().join(name);
            fs::write(&path, payload).unwrap();
            MediaFile::from_path(path)
        })
        .collect();
    (dir, batch)
}

/// Sorted file names in `dir`.
pub fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// `Show`, Drama, 2020, S1, E1.
pub fn show_policy() -> NamingPolicy {
    NamingPolicy::new("Show", Genre::Drama, 2020, 1, 1)
}
