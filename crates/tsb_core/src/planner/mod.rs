//! Chunk planning for oversized normalized audio.
//!
//! The transcription service enforces two independent ceilings on a
//! single request: a payload byte size and an audio duration. The
//! planner decides whether a normalized artifact fits as-is and, if
//! not, computes a safe per-chunk duration that respects both ceilings
//! (plus an absolute cap bounding segment count and per-call latency),
//! then drives the transcoder's segment mode to produce the ordered
//! chunk sequence.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::Settings;
use crate::models::{AudioChunk, NormalizedAudio};
use crate::transcode::{ConversionError, Transcoder};

/// Service limits and margins that drive chunk sizing.
#[derive(Debug, Clone)]
pub struct ChunkLimits {
    /// Hard payload size ceiling per request, in bytes.
    pub byte_ceiling: u64,
    /// Bytes per second of audio at the normalizer's target bitrate.
    ///
    /// Must be derived from the target bitrate, not the source bitrate:
    /// splitting re-containers the already-normalized stream without
    /// re-encoding.
    pub bytes_per_sec: u64,
    /// Seconds shaved off the byte-derived duration limit.
    pub size_margin_secs: u32,
    /// Hard audio duration ceiling per request, in seconds.
    pub duration_ceiling_secs: u32,
    /// Seconds shaved off the duration ceiling.
    pub duration_margin_secs: u32,
    /// Absolute per-chunk cap, bounding segment count and call latency.
    pub absolute_cap_secs: u32,
}

impl ChunkLimits {
    /// Build limits from application settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            byte_ceiling: settings.chunking.byte_ceiling,
            bytes_per_sec: u64::from(settings.transcription.bitrate_kbps) * 1000 / 8,
            size_margin_secs: settings.chunking.size_margin_secs,
            duration_ceiling_secs: settings.chunking.duration_ceiling_secs,
            duration_margin_secs: settings.chunking.duration_margin_secs,
            absolute_cap_secs: settings.chunking.absolute_cap_secs,
        }
    }
}

/// Error type for chunk planning.
#[derive(Error, Debug)]
pub enum ChunkPlanError {
    /// The configured limits produce a non-positive chunk duration.
    ///
    /// Raised before any tool invocation; a zero or negative duration
    /// would otherwise make the segmenter produce nonsense.
    #[error(
        "Configured limits produce an unusable chunk duration \
         (byte-derived {byte_limit_secs}s, duration-derived {duration_limit_secs}s, cap {cap_secs}s)"
    )]
    InvalidLimits {
        byte_limit_secs: i64,
        duration_limit_secs: i64,
        cap_secs: u32,
    },

    /// Segmentation ran but produced no chunk files.
    #[error("Segmentation produced no chunks for {0}")]
    NoChunks(String),

    /// The segmented files skip an index; reassembly would silently
    /// drop the missing span.
    #[error("Chunk sequence is not contiguous: expected index {expected}, found {found}")]
    NonContiguous { expected: usize, found: usize },

    /// The underlying transcoder call failed.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Result type for planning operations.
pub type PlanResult<T> = Result<T, ChunkPlanError>;

/// Compute the per-chunk duration in seconds.
///
/// The duration is the minimum of three quantities, each a safety
/// margin below a hard limit:
/// 1. what fits under the byte ceiling at the target bitrate,
/// 2. what fits under the service's duration ceiling,
/// 3. an absolute cap.
pub fn chunk_duration_secs(limits: &ChunkLimits) -> PlanResult<u32> {
    let byte_limit_secs =
        (limits.byte_ceiling / limits.bytes_per_sec) as i64 - i64::from(limits.size_margin_secs);
    let duration_limit_secs =
        i64::from(limits.duration_ceiling_secs) - i64::from(limits.duration_margin_secs);

    let chunk_secs = byte_limit_secs
        .min(duration_limit_secs)
        .min(i64::from(limits.absolute_cap_secs));

    if chunk_secs <= 0 {
        return Err(ChunkPlanError::InvalidLimits {
            byte_limit_secs,
            duration_limit_secs,
            cap_secs: limits.absolute_cap_secs,
        });
    }

    Ok(chunk_secs as u32)
}

/// Plan the chunk sequence for one normalized artifact.
///
/// Below the byte ceiling the whole artifact becomes the single chunk,
/// with no extra encoding pass. Otherwise the artifact is split into
/// fixed-duration chunk files named `{stem}_NNN.mp3` (zero-padded so
/// lexicographic and numeric order coincide) and the pre-split artifact
/// is deleted, superseded by the chunk sequence.
pub fn plan_chunks(
    transcoder: &dyn Transcoder,
    audio: &NormalizedAudio,
    limits: &ChunkLimits,
    stem: &str,
) -> PlanResult<Vec<AudioChunk>> {
    if audio.size_bytes < limits.byte_ceiling {
        let duration_secs = transcoder.probe_duration(&audio.path)?;
        tracing::debug!(
            "{} fits under the {} byte ceiling, single chunk",
            audio.path.display(),
            limits.byte_ceiling
        );
        return Ok(vec![AudioChunk {
            index: 0,
            path: audio.path.clone(),
            size_bytes: audio.size_bytes,
            duration_secs,
        }]);
    }

    let chunk_secs = chunk_duration_secs(limits)?;
    let total_secs = transcoder.probe_duration(&audio.path)?;

    tracing::warn!(
        "{} is {:.2} MB, splitting into {}s chunks",
        audio.path.display(),
        audio.size_bytes as f64 / (1024.0 * 1024.0),
        chunk_secs
    );

    let scratch = audio.path.parent().unwrap_or_else(|| Path::new("."));
    let pattern = scratch.join(format!("{}_%03d.mp3", stem));
    transcoder.segment(&audio.path, chunk_secs, &pattern)?;

    let mut chunks = collect_chunks(scratch, stem, chunk_secs, total_secs)?;
    chunks.sort_by_key(|c| c.index);

    if chunks.is_empty() {
        return Err(ChunkPlanError::NoChunks(audio.path.display().to_string()));
    }

    // Indices must run 0..N-1 with no gaps; a hole means a span of
    // audio would vanish from the transcript without any error.
    for (expected, chunk) in chunks.iter().enumerate() {
        if chunk.index != expected {
            return Err(ChunkPlanError::NonContiguous {
                expected,
                found: chunk.index,
            });
        }
    }

    // The whole artifact is superseded by the chunk sequence.
    if let Err(e) = fs::remove_file(&audio.path) {
        tracing::warn!("Failed to remove pre-split artifact {}: {}", audio.path.display(), e);
    }

    tracing::info!("Split complete: {} chunks", chunks.len());

    Ok(chunks)
}

/// Gather segmented chunk files from the scratch directory.
fn collect_chunks(
    scratch: &Path,
    stem: &str,
    chunk_secs: u32,
    total_secs: f64,
) -> PlanResult<Vec<AudioChunk>> {
    let prefix = format!("{}_", stem);
    let mut chunks = Vec::new();

    let entries = fs::read_dir(scratch)
        .map_err(|e| ConversionError::io("reading scratch directory", e))?;

    for entry in entries {
        let entry = entry.map_err(|e| ConversionError::io("reading scratch entry", e))?;
        let path = entry.path();
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => continue,
        };

        let index = match name
            .strip_prefix(&prefix)
            .and_then(|rest| rest.strip_suffix(".mp3"))
            .and_then(|digits| digits.parse::<usize>().ok())
        {
            Some(i) => i,
            None => continue,
        };

        let size_bytes = fs::metadata(&path)
            .map_err(|e| ConversionError::io("reading chunk metadata", e))?
            .len();

        let start = index as f64 * f64::from(chunk_secs);
        let duration_secs = (total_secs - start).clamp(0.0, f64::from(chunk_secs));

        chunks.push(AudioChunk {
            index,
            path,
            size_bytes,
            duration_secs,
        });
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::models::NormalizedAudio;
    use crate::transcode::ConversionResult;

    fn limits() -> ChunkLimits {
        // Defaults: 25 MiB ceiling, 128 kbps -> 16000 B/s, 5s margins,
        // 1500s duration ceiling, 600s cap.
        ChunkLimits {
            byte_ceiling: 25 * 1024 * 1024,
            bytes_per_sec: 16_000,
            size_margin_secs: 5,
            duration_ceiling_secs: 1500,
            duration_margin_secs: 5,
            absolute_cap_secs: 600,
        }
    }

    /// Mock transcoder that fabricates segment files on demand.
    struct MockTranscoder {
        total_secs: f64,
        chunk_size_bytes: u64,
        segment_calls: AtomicUsize,
        segmented: Mutex<Vec<PathBuf>>,
    }

    impl MockTranscoder {
        fn new(total_secs: f64, chunk_size_bytes: u64) -> Self {
            Self {
                total_secs,
                chunk_size_bytes,
                segment_calls: AtomicUsize::new(0),
                segmented: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transcoder for MockTranscoder {
        fn normalize(&self, _input: &Path, _output: &Path) -> ConversionResult<NormalizedAudio> {
            unimplemented!("not used by planner tests")
        }

        fn segment(&self, _input: &Path, chunk_secs: u32, pattern: &Path) -> ConversionResult<()> {
            self.segment_calls.fetch_add(1, Ordering::SeqCst);
            let count = (self.total_secs / f64::from(chunk_secs)).ceil() as usize;
            let template = pattern.to_string_lossy().to_string();
            let mut written = self.segmented.lock().unwrap();
            for i in 0..count {
                let path = PathBuf::from(template.replace("%03d", &format!("{:03}", i)));
                fs::write(&path, vec![0u8; self.chunk_size_bytes as usize]).unwrap();
                written.push(path);
            }
            Ok(())
        }

        fn to_pcm_wav(&self, _input: &Path, _output: &Path) -> ConversionResult<()> {
            unimplemented!("not used by planner tests")
        }

        fn probe_duration(&self, _input: &Path) -> ConversionResult<f64> {
            Ok(self.total_secs)
        }
    }

    #[test]
    fn under_ceiling_yields_single_chunk_without_segmenting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talk_for_api.mp3");
        fs::write(&path, vec![0u8; 9_000_000]).unwrap(); // 9 MB, under 25 MiB

        let audio = NormalizedAudio {
            path: path.clone(),
            size_bytes: 9_000_000,
        };
        let mock = MockTranscoder::new(600.0, 0);

        let chunks = plan_chunks(&mock, &audio, &limits(), "talk").unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].path, path);
        assert_eq!(chunks[0].size_bytes, 9_000_000);
        assert_eq!(mock.segment_calls.load(Ordering::SeqCst), 0);
        // The whole artifact is the chunk; it must not be deleted here.
        assert!(path.exists());
    }

    #[test]
    fn chunk_duration_respects_all_three_limits() {
        let l = limits();
        let secs = chunk_duration_secs(&l).unwrap();
        let byte_limit = (l.byte_ceiling / l.bytes_per_sec) as i64 - i64::from(l.size_margin_secs);
        assert!(i64::from(secs) <= byte_limit);
        assert!(secs <= l.duration_ceiling_secs - l.duration_margin_secs);
        assert!(secs <= l.absolute_cap_secs);
        // With the default limits the absolute cap is the binding one.
        assert_eq!(secs, 600);
    }

    #[test]
    fn byte_ceiling_can_be_the_binding_limit() {
        let mut l = limits();
        l.byte_ceiling = 1_600_000; // 100s of audio at 16000 B/s
        let secs = chunk_duration_secs(&l).unwrap();
        assert_eq!(secs, 95); // 100 - 5s margin
    }

    #[test]
    fn non_positive_duration_is_a_configuration_error() {
        let mut l = limits();
        l.byte_ceiling = 16_000; // 1s of audio, eaten by the 5s margin
        let err = chunk_duration_secs(&l).unwrap_err();
        assert!(matches!(err, ChunkPlanError::InvalidLimits { .. }));
    }

    #[test]
    fn two_hour_artifact_splits_into_twelve_ordered_chunks() {
        // 2h of audio normalizing to 120 MB: cap binds at 600s -> 12 chunks.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lecture_for_api.mp3");
        fs::write(&path, vec![0u8; 1024]).unwrap(); // placeholder content

        let audio = NormalizedAudio {
            path: path.clone(),
            size_bytes: 120 * 1024 * 1024,
        };
        let mock = MockTranscoder::new(7200.0, 9_600_000);

        let chunks = plan_chunks(&mock, &audio, &limits(), "lecture").unwrap();
        assert_eq!(chunks.len(), 12);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            let name = chunk.path.file_name().unwrap().to_string_lossy().to_string();
            assert_eq!(name, format!("lecture_{:03}.mp3", i));
            assert!((chunk.duration_secs - 600.0).abs() < f64::EPSILON);
        }
        // Pre-split artifact is superseded and deleted.
        assert!(!path.exists());
    }

    #[test]
    fn gapped_segment_output_is_rejected() {
        // Writes segment files 000 and 002, skipping 001.
        struct GappedTranscoder;

        impl Transcoder for GappedTranscoder {
            fn normalize(&self, _input: &Path, _output: &Path) -> ConversionResult<NormalizedAudio> {
                unimplemented!("not used")
            }

            fn segment(
                &self,
                _input: &Path,
                _chunk_secs: u32,
                pattern: &Path,
            ) -> ConversionResult<()> {
                let template = pattern.to_string_lossy().to_string();
                for i in [0usize, 2] {
                    let path = PathBuf::from(template.replace("%03d", &format!("{:03}", i)));
                    fs::write(&path, b"chunk").unwrap();
                }
                Ok(())
            }

            fn to_pcm_wav(&self, _input: &Path, _output: &Path) -> ConversionResult<()> {
                unimplemented!("not used")
            }

            fn probe_duration(&self, _input: &Path) -> ConversionResult<f64> {
                Ok(1800.0)
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("townhall_for_api.mp3");
        fs::write(&path, vec![0u8; 1024]).unwrap();

        let audio = NormalizedAudio {
            path: path.clone(),
            size_bytes: 30 * 1024 * 1024,
        };

        let err = plan_chunks(&GappedTranscoder, &audio, &limits(), "townhall").unwrap_err();
        assert!(matches!(
            err,
            ChunkPlanError::NonContiguous {
                expected: 1,
                found: 2
            }
        ));
        // The pre-split artifact survives a rejected sequence.
        assert!(path.exists());
    }

    #[test]
    fn trailing_chunk_carries_remainder_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q3_for_api.mp3");
        fs::write(&path, vec![0u8; 1024]).unwrap();

        let audio = NormalizedAudio {
            path,
            size_bytes: 30 * 1024 * 1024,
        };
        // 1450s total -> chunks of 600s, 600s, 250s
        let mock = MockTranscoder::new(1450.0, 9_600_000);

        let chunks = plan_chunks(&mock, &audio, &limits(), "q3").unwrap();
        assert_eq!(chunks.len(), 3);
        assert!((chunks[2].duration_secs - 250.0).abs() < 1e-9);
    }
}
