//! Error types for the orchestrator pipeline.
//!
//! Errors carry context that chains through layers:
//! Item → Step → Operation → Detail

use std::io;

use thiserror::Error;

use crate::planner::ChunkPlanError;
use crate::services::TranscriptionError;
use crate::transcode::ConversionError;

/// Top-level pipeline error with item context.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A step failed during execution.
    #[error("Item '{item_name}' failed at step '{step_name}': {source}")]
    StepFailed {
        item_name: String,
        step_name: String,
        #[source]
        source: StepError,
    },

    /// Failed to set up the item (create scratch directory, etc.).
    #[error("Item '{item_name}' setup failed: {message}")]
    SetupFailed { item_name: String, message: String },
}

impl PipelineError {
    /// Create a step failed error.
    pub fn step_failed(
        item_name: impl Into<String>,
        step_name: impl Into<String>,
        source: StepError,
    ) -> Self {
        Self::StepFailed {
            item_name: item_name.into(),
            step_name: step_name.into(),
            source,
        }
    }

    /// Create a setup failed error.
    pub fn setup_failed(item_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SetupFailed {
            item_name: item_name.into(),
            message: message.into(),
        }
    }
}

/// Error from a pipeline step with operation context.
#[derive(Error, Debug)]
pub enum StepError {
    /// Input validation failed.
    #[error("Input validation failed: {0}")]
    InvalidInput(String),

    /// Output validation failed.
    #[error("Output validation failed: {0}")]
    InvalidOutput(String),

    /// A precondition was not met (earlier step output missing).
    #[error("Precondition not met: {0}")]
    PreconditionFailed(String),

    /// Normalization or WAV fallback transcoding failed.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Chunk planning or segmentation failed.
    #[error(transparent)]
    ChunkPlan(#[from] ChunkPlanError),

    /// A chunk could not be transcribed.
    #[error("Transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    /// File I/O error.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl StepError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an invalid output error.
    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput(message.into())
    }

    /// Create a precondition failed error.
    pub fn precondition_failed(message: impl Into<String>) -> Self {
        Self::PreconditionFailed(message.into())
    }

    /// Create an I/O error with context.
    pub fn io_error(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}

/// Result type for step operations.
pub type StepResult<T> = Result<T, StepError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
