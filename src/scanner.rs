//! Directory scanner.
//!
//! Discovers candidate episode files and builds the ordered batch handed to
//! the reconciler.

use crate::config::ScanConfig;
use anyhow::{Context, Result};
use episodist_av::workspace::STAGING_PREFIX;
use episodist_common::{paths::has_extension, EpisodePosition, MediaFile};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info};
use walkdir::WalkDir;

fn episode_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(?:^|[^a-z0-9])s(\d{1,3})[ ._-]?e(\d{1,4})(?:[^0-9]|$)")
            .expect("episode pattern is valid")
    })
}

/// Detect an `SxxEyy` marker in a file name.
///
/// ```
/// use episodist::scanner::detect_episode;
///
/// let pos = detect_episode("Show - S01E02.mkv").unwrap();
/// assert_eq!((pos.season, pos.episode), (1, 2));
/// assert!(detect_episode("holiday.mp4").is_none());
/// ```
pub fn detect_episode(file_name: &str) -> Option<EpisodePosition> {
    let captures = episode_pattern().captures(file_name)?;
    Some(EpisodePosition {
        season: captures.get(1)?.as_str().parse().ok()?,
        episode: captures.get(2)?.as_str().parse().ok()?,
    })
}

/// Recursively collect media files under `dir`, sorted case-insensitively by
/// file name and then by full path.
pub fn scan_directory(dir: &Path, config: &ScanConfig) -> Result<Vec<MediaFile>> {
    let metadata =
        std::fs::metadata(dir).with_context(|| format!("Cannot scan {:?}", dir))?;
    if !metadata.is_dir() {
        anyhow::bail!("Not a directory: {:?}", dir);
    }

    info!("Scanning directory: {:?}", dir);
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if name.starts_with(STAGING_PREFIX) {
            debug!("Skipping staging leftover: {:?}", entry.path());
            continue;
        }
        if !has_extension(entry.path(), &config.extensions) {
            continue;
        }

        let detected = detect_episode(&name);
        files.push(MediaFile::from_path(entry.path()).with_detected(detected));
    }

    files.sort_by_cached_key(|f| (f.file_name().to_lowercase(), f.path.clone()));
    info!("Found {} media files in {:?}", files.len(), dir);

    Ok(files)
}

/// Build a batch from command-line paths: a single directory is scanned,
/// anything else is taken as an explicit file list in the given order.
pub fn collect_batch(paths: &[PathBuf], config: &ScanConfig) -> Result<Vec<MediaFile>> {
    if let [single] = paths {
        if single.is_dir() {
            return scan_directory(single, config);
        }
    }

    paths
        .iter()
        .map(|path| {
            if !path.is_file() {
                anyhow::bail!("Not a file: {:?}", path);
            }
            let detected = path
                .file_name()
                .and_then(|n| detect_episode(&n.to_string_lossy()));
            Ok(MediaFile::from_path(path).with_detected(detected))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use episodist_common::ContainerKind;
    use std::fs;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn test_detect_episode_variants() {
        assert_eq!(
            detect_episode("show.s02e10.720p.mkv"),
            Some(EpisodePosition { season: 2, episode: 10 })
        );
        assert_eq!(
            detect_episode("Show S1 E100.mp4"),
            Some(EpisodePosition { season: 1, episode: 100 })
        );
        assert_eq!(
            detect_episode("Show_S01_E03.mp4"),
            Some(EpisodePosition { season: 1, episode: 3 })
        );
        assert!(detect_episode("Chess101E2.mp4").is_none());
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b episode.MKV");
        touch(dir.path(), "A episode.mp4");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), ".episodist-abc123.mp4");
        touch(dir.path(), "nested/c episode S01E03.m4v");

        let files = scan_directory(dir.path(), &ScanConfig::default()).unwrap();
        let names: Vec<String> = files.iter().map(|f| f.file_name()).collect();
        assert_eq!(
            names,
            vec!["A episode.mp4", "b episode.MKV", "c episode S01E03.m4v"]
        );
        assert_eq!(files[1].container, ContainerKind::Matroska);
        assert_eq!(
            files[2].detected,
            Some(EpisodePosition { season: 1, episode: 3 })
        );
        assert!(files.iter().all(|f| f.selected));
    }

    #[test]
    fn test_scan_custom_extensions() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.avi");
        touch(dir.path(), "b.mp4");

        let config = ScanConfig {
            extensions: vec![".AVI".to_string()],
        };
        let files = scan_directory(dir.path(), &config).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].container, ContainerKind::Other);
    }

    #[test]
    fn test_scan_rejects_missing_and_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_directory(&dir.path().join("missing"), &ScanConfig::default()).is_err());

        let file = touch(dir.path(), "a.mp4");
        assert!(scan_directory(&file, &ScanConfig::default()).is_err());
    }

    #[test]
    fn test_collect_batch_keeps_given_order() {
        let dir = tempfile::tempdir().unwrap();
        let b = touch(dir.path(), "b.mp4");
        let a = touch(dir.path(), "a.mkv");

        let batch = collect_batch(&[b.clone(), a.clone()], &ScanConfig::default()).unwrap();
        assert_eq!(batch[0].path, b);
        assert_eq!(batch[1].path, a);

        assert!(collect_batch(&[dir.path().join("gone.mp4")], &ScanConfig::default()).is_err());
    }
}
