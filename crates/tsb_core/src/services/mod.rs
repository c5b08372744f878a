//! External service collaborators.
//!
//! The speech-to-text and summarization services are consumed behind
//! trait seams so the pipeline can be exercised without network access.
//! Production implementations talk to an OpenAI-compatible API over
//! blocking HTTP, matching the pipeline's sequential execution model.

mod summarizer;
mod transcriber;

use std::io;
use std::path::Path;

use thiserror::Error;

pub use summarizer::OpenAiSummarizer;
pub use transcriber::{OpenAiTranscriber, TranscriptionClient};

/// Per-chunk transcription error.
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// The service reported the input as corrupted or in an unsupported
    /// format. Eligible for the single format-fallback retry.
    #[error("Unreadable audio format: {0}")]
    Format(String),

    /// Any other service-side failure. Terminal for the chunk.
    #[error("Transcription service error: {0}")]
    Service(String),

    /// Failed to read the audio file from disk.
    #[error("Failed to read audio: {0}")]
    Io(#[from] io::Error),
}

/// Summarization error. Never fatal to an item's outcome.
#[derive(Error, Debug)]
pub enum SummaryError {
    /// Service-side failure.
    #[error("Summarization service error: {0}")]
    Service(String),

    /// The service returned no usable summary text.
    #[error("Summarization returned an empty response")]
    EmptyResponse,
}

/// Parameters attached to every transcription request for one item.
#[derive(Debug, Clone)]
pub struct TranscribeRequest {
    /// Model identifier.
    pub model: String,
    /// Optional language hint (ISO-639). None means auto-detect.
    pub language: Option<String>,
    /// Optional domain prompt.
    pub prompt: Option<String>,
}

/// Speech-to-text collaborator: one audio file in, plain text out.
pub trait SpeechToText: Send + Sync {
    /// Transcribe the audio file at `audio_path`.
    ///
    /// Returns the transcript text, or a structured error that
    /// distinguishes bad-input/format failures from other failures.
    fn transcribe(
        &self,
        audio_path: &Path,
        request: &TranscribeRequest,
    ) -> Result<String, TranscriptionError>;
}

/// Summarization collaborator: system instruction + transcript in,
/// summary text out.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, system_prompt: &str, transcript: &str) -> Result<String, SummaryError>;
}
