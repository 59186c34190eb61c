//! Core type definitions: container kinds and the closed genre set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Media wrapper format, deciding which tag-editing mechanism applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    /// MPEG-4 Part 14 (`.mp4`, `.m4v`).
    Mp4,
    /// Matroska (`.mkv`).
    Matroska,
    /// A scanned media file no editor understands (e.g. `.avi`).
    Other,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mp4 => write!(f, "mp4"),
            Self::Matroska => write!(f, "matroska"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Allowed genre labels. Free text is never accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Genre {
    Action,
    Adventure,
    Animated,
    Anime,
    Comedy,
    Drama,
    Fantasy,
    Horror,
    Musical,
    Mystery,
    Romance,
    ScienceFiction,
    Sports,
    Thriller,
    Western,
}

impl Genre {
    /// Every genre, in display order.
    pub const ALL: [Genre; 15] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Animated,
        Genre::Anime,
        Genre::Comedy,
        Genre::Drama,
        Genre::Fantasy,
        Genre::Horror,
        Genre::Musical,
        Genre::Mystery,
        Genre::Romance,
        Genre::ScienceFiction,
        Genre::Sports,
        Genre::Thriller,
        Genre::Western,
    ];

    /// Label written into container tags.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Action => "Action",
            Self::Adventure => "Adventure",
            Self::Animated => "Animated",
            Self::Anime => "Anime",
            Self::Comedy => "Comedy",
            Self::Drama => "Drama",
            Self::Fantasy => "Fantasy",
            Self::Horror => "Horror",
            Self::Musical => "Musical",
            Self::Mystery => "Mystery",
            Self::Romance => "Romance",
            Self::ScienceFiction => "Science Fiction",
            Self::Sports => "Sports",
            Self::Thriller => "Thriller",
            Self::Western => "Western",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Genre {
    type Err = String;

    /// Case-insensitive match on the label; `_` and `-` stand in for spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['_', '-'], " ").to_lowercase();
        Genre::ALL
            .iter()
            .copied()
            .find(|g| g.label().to_lowercase() == wanted)
            .ok_or_else(|| format!("Unknown genre: {}", s))
    }
}

impl TryFrom<String> for Genre {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Genre> for String {
    fn from(genre: Genre) -> Self {
        genre.label().to_string()
    }
}
