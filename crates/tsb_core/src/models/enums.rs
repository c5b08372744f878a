//! Outcome classification and run-level tallies.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Why an item was skipped without being processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Extension is not in the supported set.
    UnsupportedExtension(String),
    /// A transcript for this item already exists (idempotency signal).
    AlreadyTranscribed(PathBuf),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedExtension(ext) => {
                write!(f, "unsupported extension '.{}'", ext)
            }
            SkipReason::AlreadyTranscribed(path) => {
                write!(f, "transcript already exists: {}", path.display())
            }
        }
    }
}

/// Terminal outcome for one media item.
///
/// Each item moves from pending to exactly one of these states and is
/// never re-attempted within the same run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemOutcome {
    /// Transcript and summary both written.
    Processed,
    /// Transcript written, but summarization failed (non-fatal).
    PartiallyProcessed,
    /// Item was not processed, by policy rather than error.
    Skipped(SkipReason),
    /// Conversion or transcription failed; no transcript written.
    Failed(String),
}

impl ItemOutcome {
    /// Short label for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            ItemOutcome::Processed => "processed",
            ItemOutcome::PartiallyProcessed => "partially processed",
            ItemOutcome::Skipped(_) => "skipped",
            ItemOutcome::Failed(_) => "failed",
        }
    }
}

/// Per-run tally of item outcomes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Items fully processed (transcript + summary).
    pub processed: u32,
    /// Items with a transcript but a failed summary.
    pub partially_processed: u32,
    /// Items skipped by policy.
    pub skipped: u32,
    /// Items that failed during conversion or transcription.
    pub failed: u32,
}

impl RunReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one item outcome.
    pub fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Processed => self.processed += 1,
            ItemOutcome::PartiallyProcessed => self.partially_processed += 1,
            ItemOutcome::Skipped(_) => self.skipped += 1,
            ItemOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Total number of items seen.
    pub fn total(&self) -> u32 {
        self.processed + self.partially_processed + self.skipped + self.failed
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed: {}  partially processed: {}  skipped: {}  failed: {}",
            self.processed, self.partially_processed, self.skipped, self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_records_each_outcome() {
        let mut report = RunReport::new();
        report.record(&ItemOutcome::Processed);
        report.record(&ItemOutcome::PartiallyProcessed);
        report.record(&ItemOutcome::Skipped(SkipReason::UnsupportedExtension(
            "txt".to_string(),
        )));
        report.record(&ItemOutcome::Failed("conversion failed".to_string()));
        report.record(&ItemOutcome::Processed);

        assert_eq!(report.processed, 2);
        assert_eq!(report.partially_processed, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.total(), 5);
    }

    #[test]
    fn outcome_labels_are_stable() {
        assert_eq!(ItemOutcome::Processed.label(), "processed");
        assert_eq!(ItemOutcome::PartiallyProcessed.label(), "partially processed");
        assert_eq!(
            ItemOutcome::Skipped(SkipReason::UnsupportedExtension("txt".to_string())).label(),
            "skipped"
        );
        assert_eq!(ItemOutcome::Failed("boom".to_string()).label(), "failed");
    }

    #[test]
    fn skip_reason_displays_context() {
        let reason = SkipReason::AlreadyTranscribed(PathBuf::from("/out/talk.txt"));
        assert!(reason.to_string().contains("talk.txt"));

        let reason = SkipReason::UnsupportedExtension("pdf".to_string());
        assert!(reason.to_string().contains(".pdf"));
    }
}
