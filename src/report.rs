//! Batch summary for terminal and JSON output.

use crate::sequencer;
use episodist_common::{BatchOutcome, StepStatus};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// Outcome counts. `partial` and `unchanged` are subsets of `failed` and
/// `succeeded` respectively; `renamed` counts applied renames across all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub succeeded: usize,
    pub unchanged: usize,
    pub partial: usize,
    pub failed: usize,
    pub skipped: usize,
    pub renamed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub summary: Summary,
    pub outcomes: Vec<BatchOutcome>,
    /// Width of the episode number in rendered positions.
    #[serde(skip)]
    episode_padding: u8,
}

impl BatchReport {
    pub fn new(outcomes: Vec<BatchOutcome>) -> Self {
        let mut summary = Summary {
            total: outcomes.len(),
            ..Default::default()
        };

        for outcome in &outcomes {
            if outcome.rename == StepStatus::Applied {
                summary.renamed += 1;
            }
            if outcome.was_skipped() {
                summary.skipped += 1;
            } else if outcome.is_success() {
                summary.succeeded += 1;
                if outcome.is_noop() {
                    summary.unchanged += 1;
                }
            } else {
                summary.failed += 1;
                if outcome.is_partial() {
                    summary.partial += 1;
                }
            }
        }

        Self {
            summary,
            outcomes,
            episode_padding: 2,
        }
    }

    pub fn with_episode_padding(mut self, padding: u8) -> Self {
        self.episode_padding = padding;
        self
    }

    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable table, one line per file plus a summary line.
    pub fn render(&self) -> String {
        let mut out = String::new();

        for outcome in &self.outcomes {
            let marker = if !outcome.is_success() {
                "✗"
            } else if outcome.was_skipped() {
                "-"
            } else {
                "✓"
            };

            let position = match (outcome.season, outcome.episode) {
                (Some(s), Some(e)) => sequencer::episode_label(s, e, self.episode_padding),
                _ => " ".repeat(4 + usize::from(self.episode_padding)),
            };

            let _ = write!(
                out,
                "{} {} {}",
                marker,
                position,
                display_name(&outcome.original_path)
            );
            if outcome.final_path != outcome.original_path {
                let _ = write!(out, " -> {}", display_name(&outcome.final_path));
            }
            let _ = write!(
                out,
                "  [rename: {}, metadata: {}]",
                outcome.rename, outcome.metadata
            );
            if let Some(ref note) = outcome.note {
                let _ = write!(out, " ({})", note);
            }
            out.push('\n');
            if let Some(ref failure) = outcome.failure {
                let _ = writeln!(out, "    {}", failure);
            }
        }

        let s = &self.summary;
        let _ = writeln!(
            out,
            "\n{} files: {} succeeded ({} unchanged), {} failed ({} partial), {} skipped, {} renamed",
            s.total, s.succeeded, s.unchanged, s.failed, s.partial, s.skipped, s.renamed
        );
        out
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
