//! Path utilities for classifying media files by extension.

use crate::ContainerKind;
use std::path::Path;

/// Extensions handled by the MP4 editor.
const MP4_EXTENSIONS: &[&str] = &["mp4", "m4v"];

/// Extensions handled by the Matroska editor.
const MATROSKA_EXTENSIONS: &[&str] = &["mkv"];

/// Extensions scanned when no configuration overrides them.
const DEFAULT_MEDIA_EXTENSIONS: &[&str] = &["mp4", "m4v", "mkv", "avi"];

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Container kind implied by the file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use episodist_common::{paths::container_kind, ContainerKind};
///
/// assert_eq!(container_kind(Path::new("ep.MP4")), ContainerKind::Mp4);
/// assert_eq!(container_kind(Path::new("ep.mkv")), ContainerKind::Matroska);
/// assert_eq!(container_kind(Path::new("ep.avi")), ContainerKind::Other);
/// ```
pub fn container_kind(path: &Path) -> ContainerKind {
    match lowercase_extension(path) {
        Some(ext) if MP4_EXTENSIONS.contains(&ext.as_str()) => ContainerKind::Mp4,
        Some(ext) if MATROSKA_EXTENSIONS.contains(&ext.as_str()) => ContainerKind::Matroska,
        _ => ContainerKind::Other,
    }
}

/// Check if a path's extension is in `extensions` (case-insensitive, entries
/// may carry a leading dot).
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use episodist_common::paths::has_extension;
///
/// let exts = vec![".mkv".to_string(), "MP4".to_string()];
/// assert!(has_extension(Path::new("a.mp4"), &exts));
/// assert!(has_extension(Path::new("a.MKV"), &exts));
/// assert!(!has_extension(Path::new("a.srt"), &exts));
/// ```
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    match lowercase_extension(path) {
        Some(ext) => extensions
            .iter()
            .any(|e| normalize_extension(e) == ext),
        None => false,
    }
}

/// Strip a leading dot and lowercase.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Default scanned extensions.
#[must_use]
pub fn default_media_extensions() -> Vec<String> {
    DEFAULT_MEDIA_EXTENSIONS
        .iter()
        .map(|s| s.to_string())
        .collect()
}
