//! Per-file batch outcomes.

use crate::{Error, ErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Processing stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Deriving the episode position and target name.
    Sequence,
    Rename,
    Metadata,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequence => write!(f, "sequence"),
            Self::Rename => write!(f, "rename"),
            Self::Metadata => write!(f, "metadata"),
        }
    }
}

/// Result of one step (rename or metadata) for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Not requested, or not reached.
    Skipped,
    /// The file was changed.
    Applied,
    /// The file already had the desired state.
    Unchanged,
    Failed,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped => write!(f, "skipped"),
            Self::Applied => write!(f, "applied"),
            Self::Unchanged => write!(f, "unchanged"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Why and where a file failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub stage: Stage,
    pub kind: ErrorKind,
    pub message: String,
}

impl Failure {
    pub fn new(stage: Stage, error: &Error) -> Self {
        Self {
            stage,
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed ({}): {}", self.stage, self.kind, self.message)
    }
}

/// Final, immutable record for one file in one batch pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub original_path: PathBuf,
    pub final_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    pub rename: StepStatus,
    pub metadata: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
    /// Extra context for skipped files (unselected, cancelled).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl BatchOutcome {
    /// Outcome for a file that was not processed.
    pub fn skipped(path: impl Into<PathBuf>, note: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            original_path: path.clone(),
            final_path: path,
            season: None,
            episode: None,
            rename: StepStatus::Skipped,
            metadata: StepStatus::Skipped,
            failure: None,
            note: Some(note.into()),
        }
    }

    /// No step failed.
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// The file was renamed but its metadata write failed afterwards.
    pub fn is_partial(&self) -> bool {
        self.rename == StepStatus::Applied && self.metadata == StepStatus::Failed
    }

    /// Nothing needed changing and nothing failed.
    pub fn is_noop(&self) -> bool {
        self.is_success()
            && self.note.is_none()
            && self.rename != StepStatus::Applied
            && self.metadata != StepStatus::Applied
    }

    /// Not processed at all (unselected or cancelled).
    pub fn was_skipped(&self) -> bool {
        self.note.is_some() && self.failure.is_none()
    }
}
