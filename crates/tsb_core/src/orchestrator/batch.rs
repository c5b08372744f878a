//! Batch runner driving the per-item pipeline over an input set.
//!
//! Items are classified before the pipeline runs: unsupported
//! extensions and already-transcribed items are skipped, everything
//! else goes through Normalize -> Plan -> Transcribe -> Persist ->
//! Summarize. A failed item is never re-attempted within the same run;
//! the runner moves on and tallies outcomes for the final report.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::models::{ItemOutcome, MediaItem, RunReport, SkipReason};

use super::errors::PipelineError;
use super::pipeline::Pipeline;
use super::steps::{NormalizeStep, PersistStep, PlanStep, SummarizeStep, TranscribeStep};
use super::types::{Collaborators, Context, ItemState};

/// Create the standard per-item pipeline with all steps in order.
///
/// 1. Normalize - re-encode input to the canonical audio format
/// 2. Plan - decide the chunk sequence under the service ceilings
/// 3. Transcribe - per-chunk transcription with ordered reassembly
/// 4. Persist - write the transcript (the idempotency signal)
/// 5. Summarize - invoke the summarization collaborator (non-fatal)
pub fn create_standard_pipeline() -> Pipeline {
    Pipeline::new()
        .with_step(NormalizeStep::new())
        .with_step(PlanStep::new())
        .with_step(TranscribeStep::new())
        .with_step(PersistStep::new())
        .with_step(SummarizeStep::new())
}

/// Sequential batch runner.
///
/// Processes one item fully before the next begins. External calls are
/// blocking with no timeout enforced here; a hang in a collaborator
/// stalls the whole batch.
pub struct BatchRunner {
    settings: Settings,
    collaborators: Collaborators,
}

impl BatchRunner {
    /// Create a runner for the given configuration and collaborators.
    pub fn new(settings: Settings, collaborators: Collaborators) -> Self {
        Self {
            settings,
            collaborators,
        }
    }

    /// Process every file in the configured input directory.
    ///
    /// Entries are visited in name order. Subdirectories are ignored.
    /// The scratch directory is cleared when the run finishes.
    pub fn run(&self) -> io::Result<RunReport> {
        let input_dir = PathBuf::from(&self.settings.paths.input_dir);

        let mut paths: Vec<PathBuf> = fs::read_dir(&input_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        if paths.is_empty() {
            tracing::info!("Input folder {} is empty", input_dir.display());
        }

        let mut report = RunReport::new();

        for path in &paths {
            let outcome = self.process_path(path);
            report.record(&outcome);
        }

        self.clear_scratch();

        tracing::info!("Run complete: {}", report);
        Ok(report)
    }

    /// Process a single explicitly named file.
    ///
    /// Used by single-file mode; the caller is expected to have pointed
    /// the output/summary/scratch paths where it wants them.
    pub fn run_single(&self, path: &Path) -> io::Result<RunReport> {
        if !path.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("input file not found: {}", path.display()),
            ));
        }

        let mut report = RunReport::new();
        let outcome = self.process_path(path);
        report.record(&outcome);

        self.clear_scratch();

        tracing::info!("Run complete: {}", report);
        Ok(report)
    }

    /// Enumerate one path into an item and process it.
    fn process_path(&self, path: &Path) -> ItemOutcome {
        let item = match MediaItem::from_path(path) {
            Ok(item) => item,
            Err(e) => {
                let msg = format!("failed to read input {}: {}", path.display(), e);
                tracing::error!("{}", msg);
                return ItemOutcome::Failed(msg);
            }
        };

        tracing::info!("--- Processing {} ---", item.display_name());
        let outcome = self.process_item(&item);

        match &outcome {
            ItemOutcome::Processed => {
                tracing::info!("{}: {}", item.display_name(), outcome.label())
            }
            ItemOutcome::PartiallyProcessed => {
                tracing::warn!(
                    "{}: {} (transcript written, summary failed)",
                    item.display_name(),
                    outcome.label()
                )
            }
            ItemOutcome::Skipped(reason) => {
                tracing::info!("{}: {} ({})", item.display_name(), outcome.label(), reason)
            }
            ItemOutcome::Failed(error) => {
                tracing::error!("{}: {} ({})", item.display_name(), outcome.label(), error)
            }
        }

        outcome
    }

    /// Run one item through skip classification and the pipeline.
    fn process_item(&self, item: &MediaItem) -> ItemOutcome {
        if !item.has_supported_extension() {
            return ItemOutcome::Skipped(SkipReason::UnsupportedExtension(item.extension.clone()));
        }

        let transcript_path =
            PathBuf::from(&self.settings.paths.output_dir).join(item.transcript_file_name());
        if transcript_path.exists() {
            // Idempotency: completed items are never overwritten or re-run.
            return ItemOutcome::Skipped(SkipReason::AlreadyTranscribed(transcript_path));
        }

        let scratch_dir = PathBuf::from(&self.settings.paths.temp_dir);
        if let Err(e) = fs::create_dir_all(&scratch_dir) {
            let err = PipelineError::setup_failed(
                item.display_name(),
                format!("cannot create scratch directory {}: {}", scratch_dir.display(), e),
            );
            return ItemOutcome::Failed(err.to_string());
        }

        let summary_path =
            PathBuf::from(&self.settings.paths.summary_dir).join(item.summary_file_name());

        let ctx = Context::new(
            item.clone(),
            self.settings.clone(),
            scratch_dir,
            transcript_path,
            summary_path,
            self.collaborators.clone(),
        );
        let mut state = ItemState::new(item.display_name());

        let pipeline = create_standard_pipeline();
        match pipeline.run(&ctx, &mut state) {
            Ok(_) => {
                if state.summary_error.is_some() {
                    ItemOutcome::PartiallyProcessed
                } else {
                    ItemOutcome::Processed
                }
            }
            Err(e) => ItemOutcome::Failed(e.to_string()),
        }
    }

    /// Clear the scratch directory at the end of a run.
    fn clear_scratch(&self) {
        let scratch = PathBuf::from(&self.settings.paths.temp_dir);
        if !scratch.exists() {
            return;
        }
        if let Err(e) = fs::remove_dir_all(&scratch) {
            tracing::warn!("Failed to clear scratch directory {}: {}", scratch.display(), e);
        } else {
            tracing::debug!("Scratch directory {} cleared", scratch.display());
        }
    }
}
