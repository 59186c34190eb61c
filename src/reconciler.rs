//! Batch driver: numbers, renames and tags every selected file, isolating
//! failures so each file gets exactly one outcome.

use crate::renamer::{self, RenameOutcome};
use crate::sequencer::{self, Assignment};
use episodist_av::Editors;
use episodist_common::{
    BatchOutcome, ContainerKind, Failure, MediaFile, MediaMetadata, NamingPolicy, Result, Stage,
    StepStatus,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Progress callback: files done, batch size, latest outcome.
pub type ProgressCallback = Box<dyn Fn(usize, usize, &BatchOutcome) + Send + Sync>;

/// Which steps to run for each selected file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOptions {
    pub rename: bool,
    pub metadata: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            rename: true,
            metadata: true,
        }
    }
}

pub struct Reconciler {
    editors: Editors,
    stop_signal: Arc<AtomicBool>,
    progress_callback: Option<ProgressCallback>,
}

impl Reconciler {
    pub fn new(editors: Editors) -> Self {
        Self {
            editors,
            stop_signal: Arc::new(AtomicBool::new(false)),
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Flag that, once set, skips every file not yet started.
    pub fn stop_signal(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop_signal)
    }

    /// Process `batch` in order.
    ///
    /// Returns `Err` only for configuration problems detected before any file
    /// is touched; everything else lands in the per-file outcomes.
    pub fn process(
        &self,
        batch: &mut [MediaFile],
        policy: &NamingPolicy,
        options: ProcessOptions,
    ) -> Result<Vec<BatchOutcome>> {
        if options.metadata {
            self.check_editors(batch)?;
        }

        let assignments = match sequencer::assign(batch, policy) {
            Ok(assignments) => assignments,
            Err(e) => {
                warn!("Naming policy rejected: {}", e);
                let failure = Failure::new(Stage::Sequence, &e);
                let outcomes = batch
                    .iter()
                    .map(|file| {
                        if file.selected {
                            failed_before_start(file, failure.clone())
                        } else {
                            BatchOutcome::skipped(&file.path, "not selected")
                        }
                    })
                    .collect();
                return Ok(outcomes);
            }
        };

        let mut by_index: Vec<Option<Assignment>> = vec![None; batch.len()];
        for assignment in assignments {
            let index = assignment.index;
            by_index[index] = Some(assignment);
        }

        let total = batch.len();
        let mut outcomes = Vec::with_capacity(total);

        for (i, (file, assignment)) in batch.iter_mut().zip(by_index).enumerate() {
            let outcome = match assignment {
                None => BatchOutcome::skipped(&file.path, "not selected"),
                Some(_) if self.stop_signal.load(Ordering::Relaxed) => {
                    debug!("Cancelled before {:?}", file.path);
                    BatchOutcome::skipped(&file.path, "cancelled")
                }
                Some(assignment) => self.process_file(file, &assignment, options),
            };

            if let Some(ref cb) = self.progress_callback {
                cb(i + 1, total, &outcome);
            }
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    /// Fail fast when a selected container kind needs a missing tool.
    fn check_editors(&self, batch: &[MediaFile]) -> Result<()> {
        let mut checked: Vec<ContainerKind> = Vec::new();
        for file in batch.iter().filter(|f| f.selected) {
            if checked.contains(&file.container) {
                continue;
            }
            checked.push(file.container);
            if let Some(editor) = self.editors.for_kind(file.container) {
                editor.ensure_available()?;
            }
        }
        Ok(())
    }

    fn process_file(
        &self,
        file: &mut MediaFile,
        assignment: &Assignment,
        options: ProcessOptions,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome {
            original_path: file.path.clone(),
            final_path: file.path.clone(),
            season: Some(assignment.season),
            episode: Some(assignment.episode),
            rename: StepStatus::Skipped,
            metadata: StepStatus::Skipped,
            failure: None,
            note: None,
        };

        if options.rename {
            match renamer::rename(file, &assignment.target_name) {
                Ok(RenameOutcome::Renamed { .. }) => outcome.rename = StepStatus::Applied,
                Ok(RenameOutcome::Unchanged) => outcome.rename = StepStatus::Unchanged,
                Err(e) => {
                    warn!("Rename failed for {:?}: {}", file.path, e);
                    outcome.rename = StepStatus::Failed;
                    outcome.failure = Some(Failure::new(Stage::Rename, &e));
                    return outcome;
                }
            }
            outcome.final_path = file.path.clone();
        }

        if options.metadata {
            match self.apply_metadata(file, &assignment.metadata) {
                Ok(status) => outcome.metadata = status,
                Err(e) => {
                    warn!("Metadata failed for {:?}: {}", file.path, e);
                    outcome.metadata = StepStatus::Failed;
                    outcome.failure = Some(Failure::new(Stage::Metadata, &e));
                }
            }
        }

        outcome
    }

    fn apply_metadata(&self, file: &MediaFile, metadata: &MediaMetadata) -> Result<StepStatus> {
        let editor = self.editors.for_file(file)?;

        match editor.read(&file.path) {
            Ok(current) if current.matches(metadata) => {
                debug!("Tags already current for {:?}", file.path);
                return Ok(StepStatus::Unchanged);
            }
            Ok(_) => {}
            Err(e) => debug!("Could not read existing tags, writing anyway: {}", e),
        }

        editor.write(file, metadata)?;
        info!(
            "Tagged {:?} as S{:02}E{:02}",
            file.path, metadata.season, metadata.episode
        );
        Ok(StepStatus::Applied)
    }
}

fn failed_before_start(file: &MediaFile, failure: Failure) -> BatchOutcome {
    BatchOutcome {
        original_path: file.path.clone(),
        final_path: file.path.clone(),
        season: None,
        episode: None,
        rename: StepStatus::Skipped,
        metadata: StepStatus::Skipped,
        failure: Some(failure),
        note: None,
    }
}
