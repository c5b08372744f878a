//! Pipeline orchestrator for batch transcription.
//!
//! The orchestrator runs each media item through a fixed sequence of
//! steps, with validation before and after every step:
//!
//! ```text
//! Normalize -> Plan -> Transcribe -> Persist -> Summarize
//! ```
//!
//! `BatchRunner` drives the pipeline over a whole input directory,
//! classifying skips up front and tallying outcomes into a `RunReport`.

mod batch;
mod errors;
mod pipeline;
mod step;
pub mod steps;
mod types;

pub use batch::{create_standard_pipeline, BatchRunner};
pub use errors::{PipelineError, PipelineResult, StepError, StepResult};
pub use pipeline::{Pipeline, PipelineRunResult};
pub use step::PipelineStep;
pub use types::{Collaborators, Context, ItemState, ProgressCallback, StepOutcome};

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared fixtures for orchestrator tests.

    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    use crate::config::Settings;
    use crate::models::{MediaItem, NormalizedAudio};
    use crate::services::{
        SpeechToText, Summarizer, SummaryError, TranscribeRequest, TranscriptionError,
    };
    use crate::transcode::{ConversionResult, Transcoder};

    use super::types::{Collaborators, Context};

    /// Transcoder whose operations succeed without invoking any tool.
    pub struct NoopTranscoder;

    impl Transcoder for NoopTranscoder {
        fn normalize(&self, _input: &Path, output: &Path) -> ConversionResult<NormalizedAudio> {
            fs::write(output, b"audio").unwrap();
            Ok(NormalizedAudio {
                path: output.to_path_buf(),
                size_bytes: 5,
            })
        }

        fn segment(&self, _input: &Path, _chunk_secs: u32, _pattern: &Path) -> ConversionResult<()> {
            Ok(())
        }

        fn to_pcm_wav(&self, _input: &Path, output: &Path) -> ConversionResult<()> {
            fs::write(output, b"wav").unwrap();
            Ok(())
        }

        fn probe_duration(&self, _input: &Path) -> ConversionResult<f64> {
            Ok(1.0)
        }
    }

    /// Speech-to-text that always returns a fixed phrase.
    pub struct NoopStt;

    impl SpeechToText for NoopStt {
        fn transcribe(
            &self,
            _audio_path: &Path,
            _request: &TranscribeRequest,
        ) -> Result<String, TranscriptionError> {
            Ok("text".to_string())
        }
    }

    /// Summarizer that always returns a fixed summary.
    pub struct NoopSummarizer;

    impl Summarizer for NoopSummarizer {
        fn summarize(&self, _system_prompt: &str, _transcript: &str) -> Result<String, SummaryError> {
            Ok("summary".to_string())
        }
    }

    /// Build a context rooted in `dir` with a real (tiny) input file.
    pub fn test_context(
        dir: &Path,
        transcoder: Arc<dyn Transcoder>,
        speech_to_text: Arc<dyn SpeechToText>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Context {
        let input = dir.join("item.mp3");
        fs::write(&input, b"media bytes").unwrap();
        let item = MediaItem::from_path(&input).unwrap();

        let scratch = dir.join("scratch");
        fs::create_dir_all(&scratch).unwrap();

        let mut settings = Settings::default();
        settings.paths.input_dir = dir.to_string_lossy().to_string();
        settings.paths.output_dir = dir.to_string_lossy().to_string();
        settings.paths.summary_dir = dir.to_string_lossy().to_string();
        settings.paths.temp_dir = scratch.to_string_lossy().to_string();

        let transcript_path = dir.join(item.transcript_file_name());
        let summary_path = dir.join(item.summary_file_name());

        Context::new(
            item,
            settings,
            scratch,
            transcript_path,
            summary_path,
            Collaborators {
                transcoder,
                speech_to_text,
                summarizer,
                system_prompt: String::new(),
            },
        )
    }
}
