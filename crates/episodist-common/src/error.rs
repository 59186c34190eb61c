//! Error taxonomy shared by every episodist component.
//!
//! Per-file errors (`Validation`, `Collision`, `Rename`, `UnsupportedFormat`,
//! `MetadataWrite`, `MetadataRead`) are folded into batch outcomes by the
//! reconciler. Configuration errors (`ToolNotFound`, `Config`) abort a batch
//! before any file is touched.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Common error type for episodist.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The naming policy or a target name is invalid.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The rename target is already held by a different file.
    #[error("Target already exists: {} (wanted by {})", target.display(), path.display())]
    Collision { path: PathBuf, target: PathBuf },

    /// The filesystem rename itself failed.
    #[error("Rename of {} failed: {cause}", path.display())]
    Rename {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    /// No editor handles this container kind.
    #[error("Unsupported container for {}: {container}", path.display())]
    UnsupportedFormat { path: PathBuf, container: String },

    /// Writing tags failed; the original file is unmodified.
    #[error("Metadata write failed for {}: {message}", path.display())]
    MetadataWrite { path: PathBuf, message: String },

    /// Reading tags failed.
    #[error("Metadata read failed for {}: {message}", path.display())]
    MetadataRead { path: PathBuf, message: String },

    /// A required external tool is missing.
    #[error("Required tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new Validation error.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new Collision error.
    pub fn collision(path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self::Collision {
            path: path.into(),
            target: target.into(),
        }
    }

    /// Create a new Rename error.
    pub fn rename(path: impl Into<PathBuf>, cause: std::io::Error) -> Self {
        Self::Rename {
            path: path.into(),
            cause,
        }
    }

    /// Create a new UnsupportedFormat error.
    pub fn unsupported(path: impl Into<PathBuf>, container: impl fmt::Display) -> Self {
        Self::UnsupportedFormat {
            path: path.into(),
            container: container.to_string(),
        }
    }

    /// Create a new MetadataWrite error.
    pub fn metadata_write(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        Self::MetadataWrite {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a new MetadataRead error.
    pub fn metadata_read(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        Self::MetadataRead {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a new ToolNotFound error.
    pub fn tool_not_found<S: Into<String>>(tool: S) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Create a new Config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Classify this error for reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Collision { .. } => ErrorKind::Collision,
            Self::Rename { .. } => ErrorKind::Rename,
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::MetadataWrite { .. } => ErrorKind::MetadataWrite,
            Self::MetadataRead { .. } => ErrorKind::MetadataRead,
            Self::ToolNotFound { .. } => ErrorKind::ToolNotFound,
            Self::Config(_) => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Whether this error invalidates a whole batch rather than a single file.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ToolNotFound { .. } | Self::Config(_))
    }
}

/// Serializable classification of an [`Error`], kept in batch outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Collision,
    Rename,
    UnsupportedFormat,
    MetadataWrite,
    MetadataRead,
    ToolNotFound,
    Config,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::Collision => "collision",
            Self::Rename => "rename",
            Self::UnsupportedFormat => "unsupported_format",
            Self::MetadataWrite => "metadata_write",
            Self::MetadataRead => "metadata_read",
            Self::ToolNotFound => "tool_not_found",
            Self::Config => "config",
            Self::Io => "io",
        };
        f.write_str(name)
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
