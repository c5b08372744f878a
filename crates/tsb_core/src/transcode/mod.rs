//! Media transcoding via the external ffmpeg tool.
//!
//! This module owns every ffmpeg/ffprobe invocation in the pipeline:
//! - normalization of arbitrary input media to the canonical mono,
//!   16 kHz, fixed-bitrate MP3 the transcription service accepts,
//! - stream-copy segmentation of an oversized artifact into ordered,
//!   fixed-duration chunks,
//! - the one-shot PCM WAV fallback used when the service rejects a
//!   chunk's format,
//! - duration probing.
//!
//! The `Transcoder` trait is the seam the planner and pipeline steps
//! depend on, so tests can substitute a mock without a real ffmpeg.

mod ffmpeg;
mod types;

pub use ffmpeg::{ensure_ffmpeg, FfmpegTranscoder};
pub use types::{ConversionError, ConversionResult, Transcoder};
