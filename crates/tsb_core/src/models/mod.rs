//! Data model shared across the pipeline.
//!
//! These types describe the artifacts that flow through a batch run:
//! input media items, the normalized audio artifact, the ordered chunk
//! sequence derived from it, per-chunk transcript segments, and the
//! per-item / per-run outcome bookkeeping.

mod enums;
mod media;

pub use enums::{ItemOutcome, RunReport, SkipReason};
pub use media::{
    is_supported_extension, AudioChunk, MediaItem, NormalizedAudio, TranscriptSegment,
    SUPPORTED_EXTENSIONS, SUMMARY_SUFFIX, TRANSCRIPT_SUFFIX,
};
