//! Media artifact types.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Extensions the pipeline will attempt to process (lowercase, no dot).
///
/// Anything else is reported as skipped, not failed. The transcoder can
/// read all of these containers; video-only formats are still valid
/// because normalization discards non-audio streams.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "mp3", "mp4", "mpeg", "mpga", "m4a", "wav", "webm", "aac", "flac", "ogg", "opus", "mov",
    "avi", "mkv", "flv", "wmv",
];

/// Suffix appended to an item's stem for its transcript file.
pub const TRANSCRIPT_SUFFIX: &str = ".txt";

/// Suffix appended to an item's stem for its summary file.
pub const SUMMARY_SUFFIX: &str = "_summary.txt";

/// Check whether an extension is in the supported set (case-insensitive).
pub fn is_supported_extension(extension: &str) -> bool {
    let lower = extension.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS.contains(&lower.as_str())
}

/// One input media file, as enumerated from the input source.
///
/// Immutable once created; discarded after its outcome is recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    /// Full path to the input file.
    pub path: PathBuf,
    /// File stem (name without extension), used to derive output names.
    pub stem: String,
    /// Lowercased extension without the dot (empty if none).
    pub extension: String,
    /// Size of the input file in bytes.
    pub size_bytes: u64,
}

impl MediaItem {
    /// Build a media item from a file path, reading its size from disk.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "unnamed".to_string());
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            stem,
            extension,
            size_bytes: metadata.len(),
        })
    }

    /// File name for display purposes.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.stem.clone())
    }

    /// Whether this item's extension is in the supported set.
    pub fn has_supported_extension(&self) -> bool {
        is_supported_extension(&self.extension)
    }

    /// Transcript file name for this item (`{stem}.txt`).
    pub fn transcript_file_name(&self) -> String {
        format!("{}{}", self.stem, TRANSCRIPT_SUFFIX)
    }

    /// Summary file name for this item (`{stem}_summary.txt`).
    pub fn summary_file_name(&self) -> String {
        format!("{}{}", self.stem, SUMMARY_SUFFIX)
    }
}

/// The canonical audio artifact produced by normalization.
///
/// Owned exclusively by the pipeline run for one item; the file is
/// deleted once it has been split into chunks or consumed whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedAudio {
    /// Path to the normalized audio file in the scratch area.
    pub path: PathBuf,
    /// Size of the artifact in bytes.
    pub size_bytes: u64,
}

/// One ordered member of the chunk sequence derived from a normalized
/// audio artifact.
///
/// Chunks for one item are numbered 0..N-1 with no gaps; reassembly
/// order is index order, never filesystem enumeration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioChunk {
    /// Zero-based sequence index.
    pub index: usize,
    /// Path to the chunk file in the scratch area.
    pub path: PathBuf,
    /// Size of the chunk in bytes.
    pub size_bytes: u64,
    /// Duration of the chunk in seconds.
    pub duration_secs: f64,
}

/// Text result of transcribing one chunk, paired with the chunk's index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Index of the chunk this segment came from.
    pub index: usize,
    /// Transcribed text (already trimmed).
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(is_supported_extension("mp3"));
        assert!(is_supported_extension("MP4"));
        assert!(is_supported_extension("Mkv"));
        assert!(!is_supported_extension("txt"));
        assert!(!is_supported_extension(""));
    }

    #[test]
    fn media_item_derives_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Meeting Notes.MP4");
        std::fs::write(&path, b"fake video").unwrap();

        let item = MediaItem::from_path(&path).unwrap();
        assert_eq!(item.stem, "Meeting Notes");
        assert_eq!(item.extension, "mp4");
        assert_eq!(item.size_bytes, 10);
        assert!(item.has_supported_extension());
        assert_eq!(item.transcript_file_name(), "Meeting Notes.txt");
        assert_eq!(item.summary_file_name(), "Meeting Notes_summary.txt");
    }

    #[test]
    fn media_item_missing_file_errors() {
        assert!(MediaItem::from_path(Path::new("/nonexistent/clip.mp3")).is_err());
    }
}
