//! Media model: files, naming policy, and tag records.

use crate::paths::container_kind;
use crate::{ContainerKind, Error, Genre, Result};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Earliest year accepted in a naming policy.
pub const MIN_YEAR: u16 = 1900;

/// Allowed episode padding widths.
pub const EPISODE_PADDINGS: [u8; 2] = [2, 3];

/// One on-disk media item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    /// Location on disk; unique within a batch.
    pub path: PathBuf,
    /// Container format, derived from the extension.
    pub container: ContainerKind,
    /// Season/episode already present in the filename, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected: Option<EpisodePosition>,
    /// Whether the file takes part in the next batch operation.
    pub selected: bool,
}

impl MediaFile {
    /// Build a selected file, deriving the container kind from the extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let container = container_kind(&path);
        Self {
            path,
            container,
            detected: None,
            selected: true,
        }
    }

    /// Attach a season/episode detected by the scanner.
    pub fn with_detected(mut self, position: Option<EpisodePosition>) -> Self {
        self.detected = position;
        self
    }

    /// File name component as a lossy string.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Original extension (without dot), case preserved.
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
    }

    /// Directory holding the file.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// A season/episode pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodePosition {
    pub season: u32,
    pub episode: u32,
}

/// Naming and sequencing rules for one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingPolicy {
    pub title: String,
    pub genre: Genre,
    pub year: u16,
    pub start_season: u32,
    pub start_episode: u32,
    /// Digits used for the episode number (2 or 3).
    #[serde(default = "default_padding")]
    pub episode_padding: u8,
}

fn default_padding() -> u8 {
    2
}

impl NamingPolicy {
    /// Create a policy with two-digit episode padding.
    pub fn new(
        title: impl Into<String>,
        genre: Genre,
        year: u16,
        start_season: u32,
        start_episode: u32,
    ) -> Self {
        Self {
            title: title.into(),
            genre,
            year,
            start_season,
            start_episode,
            episode_padding: default_padding(),
        }
    }

    /// Override the episode padding width.
    pub fn with_padding(mut self, padding: u8) -> Self {
        self.episode_padding = padding;
        self
    }

    /// Latest year accepted: next calendar year.
    pub fn max_year() -> u16 {
        u16::try_from(chrono::Local::now().year() + 1).unwrap_or(u16::MAX)
    }

    /// Check every field, returning the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::validation("title must not be empty"));
        }
        if self.start_season == 0 {
            return Err(Error::validation("start season must be a positive integer"));
        }
        if self.start_episode == 0 {
            return Err(Error::validation("start episode must be a positive integer"));
        }
        let max_year = Self::max_year();
        if !(MIN_YEAR..=max_year).contains(&self.year) {
            return Err(Error::validation(format!(
                "year {} outside {}..={}",
                self.year, MIN_YEAR, max_year
            )));
        }
        if !EPISODE_PADDINGS.contains(&self.episode_padding) {
            return Err(Error::validation(format!(
                "episode padding must be 2 or 3, got {}",
                self.episode_padding
            )));
        }
        Ok(())
    }
}

/// The normalized tag set written into one container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaMetadata {
    /// Show title.
    pub title: String,
    /// Rendered episode name, e.g. `Show - S01E02`.
    pub episode_title: String,
    pub genre: Genre,
    pub year: u16,
    pub season: u32,
    pub episode: u32,
}

/// Tags currently stored in a container. Every field is optional because
/// files arrive with arbitrary (or no) tagging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSnapshot {
    pub title: Option<String>,
    pub show: Option<String>,
    /// Raw stored genre text; not necessarily a known [`Genre`].
    pub genre: Option<String>,
    pub year: Option<u16>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

impl TagSnapshot {
    /// Whether the stored tags already equal `metadata`.
    pub fn matches(&self, metadata: &MediaMetadata) -> bool {
        self.title.as_deref() == Some(metadata.episode_title.as_str())
            && self.show.as_deref() == Some(metadata.title.as_str())
            && self.genre.as_deref() == Some(metadata.genre.label())
            && self.year == Some(metadata.year)
            && self.season == Some(metadata.season)
            && self.episode == Some(metadata.episode)
    }

    /// True when no tag is present.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&MediaMetadata> for TagSnapshot {
    fn from(metadata: &MediaMetadata) -> Self {
        Self {
            title: Some(metadata.episode_title.clone()),
            show: Some(metadata.title.clone()),
            genre: Some(metadata.genre.label().to_string()),
            year: Some(metadata.year),
            season: Some(metadata.season),
            episode: Some(metadata.episode),
        }
    }
}

/// Parse a leading four-digit year from a tag value such as `2020` or
/// `2020-05-01T00:00:00Z`.
pub fn parse_year(value: &str) -> Option<u16> {
    let digits: String = value.trim().chars().take(4).collect();
    if digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}
