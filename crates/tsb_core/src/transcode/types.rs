//! Types for transcoding operations.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::NormalizedAudio;

/// Error type for transcoding operations.
///
/// Any of these means "no artifact produced" for the caller, which the
/// orchestrator maps to a failed item (never a skipped one).
#[derive(Error, Debug)]
pub enum ConversionError {
    /// Input file does not exist.
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// The external tool could not be started.
    #[error("Failed to run {tool}: {message}")]
    ToolUnavailable { tool: String, message: String },

    /// The external tool ran but exited with an error.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    ToolFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// The tool reported success but the expected output is missing or empty.
    #[error("Output file missing or empty: {0}")]
    OutputMissing(PathBuf),

    /// Failed to parse tool output.
    #[error("Failed to parse {tool} output: {message}")]
    ParseError { tool: String, message: String },

    /// I/O error around a tool invocation.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl ConversionError {
    /// Create a tool failure error from an exit code and stderr text.
    pub fn tool_failed(tool: impl Into<String>, exit_code: i32, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            exit_code,
            message: message.into(),
        }
    }

    /// Create an I/O error with operation context.
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}

/// Result type for transcoding operations.
pub type ConversionResult<T> = Result<T, ConversionError>;

/// External transcoding collaborator.
///
/// Production code uses `FfmpegTranscoder`; tests substitute mocks.
/// All methods block until the tool finishes.
pub trait Transcoder: Send + Sync {
    /// Convert arbitrary input media into the canonical audio artifact
    /// (mono, fixed sample rate, fixed bitrate, MP3 container), written
    /// to `output`. Discards non-audio streams before encoding.
    fn normalize(&self, input: &Path, output: &Path) -> ConversionResult<NormalizedAudio>;

    /// Split an already-normalized artifact into fixed-duration chunk
    /// files following `pattern` (a printf-style `%03d` template), by
    /// stream copy, without re-encoding.
    fn segment(&self, input: &Path, chunk_secs: u32, pattern: &Path) -> ConversionResult<()>;

    /// Re-encode one chunk to mono, 16 kHz, 16-bit PCM WAV at `output`.
    /// Used as the one-shot fallback when the transcription service
    /// rejects a chunk's format.
    fn to_pcm_wav(&self, input: &Path, output: &Path) -> ConversionResult<()>;

    /// Probe the duration of an audio file in seconds.
    fn probe_duration(&self, input: &Path) -> ConversionResult<f64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_error_displays_context() {
        let err = ConversionError::tool_failed("ffmpeg", 1, "Invalid data found");
        let msg = err.to_string();
        assert!(msg.contains("ffmpeg"));
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("Invalid data found"));
    }

    #[test]
    fn output_missing_shows_path() {
        let err = ConversionError::OutputMissing(PathBuf::from("/tmp/x.mp3"));
        assert!(err.to_string().contains("/tmp/x.mp3"));
    }
}
