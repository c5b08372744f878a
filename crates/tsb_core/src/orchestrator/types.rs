//! Core types for the orchestrator pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::models::{AudioChunk, MediaItem, NormalizedAudio};
use crate::services::{SpeechToText, Summarizer};
use crate::transcode::Transcoder;

/// Progress callback type for reporting pipeline progress.
///
/// Arguments: (step_name, percent_complete, message)
pub type ProgressCallback = Box<dyn Fn(&str, u32, &str) + Send + Sync>;

/// External collaborators shared across all items in a run.
///
/// Cloning is cheap; only the `Arc`s are copied.
#[derive(Clone)]
pub struct Collaborators {
    /// Transcoding tool wrapper.
    pub transcoder: Arc<dyn Transcoder>,
    /// Speech-to-text service client.
    pub speech_to_text: Arc<dyn SpeechToText>,
    /// Summarization service client.
    pub summarizer: Arc<dyn Summarizer>,
    /// System instruction for summarization (may be empty).
    pub system_prompt: String,
}

/// Read-only context passed to pipeline steps.
///
/// Contains the item, configuration, target paths, and shared
/// collaborators that steps can read but not modify. Mutable state
/// goes in `ItemState`.
pub struct Context {
    /// The media item being processed.
    pub item: MediaItem,
    /// Application settings.
    pub settings: Settings,
    /// Scratch directory for this run's temporary artifacts.
    pub scratch_dir: PathBuf,
    /// Target path for the transcript file.
    pub transcript_path: PathBuf,
    /// Target path for the summary file.
    pub summary_path: PathBuf,
    /// Shared external collaborators.
    pub collaborators: Collaborators,
    /// Optional progress callback.
    progress_callback: Option<ProgressCallback>,
}

impl Context {
    /// Create a new context for one item.
    pub fn new(
        item: MediaItem,
        settings: Settings,
        scratch_dir: PathBuf,
        transcript_path: PathBuf,
        summary_path: PathBuf,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            item,
            settings,
            scratch_dir,
            transcript_path,
            summary_path,
            collaborators,
            progress_callback: None,
        }
    }

    /// Set the progress callback.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Report progress to the callback (if set).
    pub fn report_progress(&self, step_name: &str, percent: u32, message: &str) {
        if let Some(ref callback) = self.progress_callback {
            callback(step_name, percent, message);
        }
    }
}

/// Mutable item state that accumulates results from pipeline steps.
///
/// Steps add new data as they complete; each step's output lives in
/// its own field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemState {
    /// Item name for identification.
    pub item_name: String,
    /// When processing started.
    pub started_at: Option<String>,
    /// Normalized audio artifact (from Normalize step). The backing
    /// file may already be deleted once planning has split it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized: Option<NormalizedAudio>,
    /// Planned chunk sequence (from Plan step); taken by Transcribe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<Vec<AudioChunk>>,
    /// Assembled transcript (from Transcribe step).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    /// Path of the persisted transcript (from Persist step).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript_path: Option<PathBuf>,
    /// Path of the written summary (from Summarize step).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_path: Option<PathBuf>,
    /// Summarization failure, recorded without failing the item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_error: Option<String>,
}

impl ItemState {
    /// Create a new state for the given item name.
    pub fn new(item_name: impl Into<String>) -> Self {
        Self {
            item_name: item_name.into(),
            started_at: Some(chrono::Local::now().to_rfc3339()),
            ..Default::default()
        }
    }

    /// Check if normalization has completed.
    pub fn has_normalized(&self) -> bool {
        self.normalized.is_some()
    }

    /// Check if chunk planning has completed.
    pub fn has_chunks(&self) -> bool {
        self.chunks.is_some()
    }

    /// Check if a transcript has been assembled.
    pub fn has_transcript(&self) -> bool {
        self.transcript.is_some()
    }
}

/// Result of executing a pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step completed successfully.
    Success,
    /// Step was skipped (not an error).
    Skipped(String),
}
