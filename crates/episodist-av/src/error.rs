//! Errors from the tag backends.
//!
//! These stay internal to an editor: [`MetadataEditor`](crate::MetadataEditor)
//! folds them into the common `MetadataWrite`/`MetadataRead` errors, keeping
//! the message.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// MKVToolNix binary missing from the configured path and `PATH`.
    #[error("{tool} is not installed")]
    ToolNotFound { tool: String },

    /// Tool ran but reported failure (exit status, signal, timeout).
    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    /// Tool output could not be understood.
    #[error("unreadable {tool} output: {message}")]
    ParseError { tool: String, message: String },

    #[error("no such file: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// `mp4ameta` rejected the container.
    #[error("MP4 atoms: {0}")]
    Tag(String),

    /// Tags written to the staged copy did not read back.
    #[error("tags did not stick: {0}")]
    Verification(String),

    /// Staging copy could not be created or committed.
    #[error("staging failed: {0}")]
    Workspace(String),
}

impl Error {
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn parse_error(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }
}

impl From<mp4ameta::Error> for Error {
    fn from(err: mp4ameta::Error) -> Self {
        Error::Tag(err.to_string())
    }
}
