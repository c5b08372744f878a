//! Transcribe step - drives per-chunk transcription and reassembly.
//!
//! Chunks are transcribed one at a time, strictly in index order, and
//! reassembled all-or-nothing: a single failing chunk fails the item
//! and no partial transcript survives.

use crate::aggregate;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, ItemState, StepOutcome};
use crate::services::{TranscribeRequest, TranscriptionClient};

/// Transcribe step wiring the client, fallback policy, and aggregator.
pub struct TranscribeStep;

impl TranscribeStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TranscribeStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for TranscribeStep {
    fn name(&self) -> &str {
        "Transcribe"
    }

    fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut ItemState) -> StepResult<StepOutcome> {
        let chunks = state
            .chunks
            .take()
            .ok_or_else(|| StepError::precondition_failed("Plan step has not run"))?;

        let request = TranscribeRequest {
            model: ctx.settings.transcription.model.clone(),
            language: ctx.settings.transcription.language.clone(),
            prompt: ctx.settings.transcription.prompt.clone(),
        };

        let client = TranscriptionClient::new(
            ctx.collaborators.speech_to_text.as_ref(),
            ctx.collaborators.transcoder.as_ref(),
            request,
        );

        let total = chunks.len();
        let transcript = aggregate::aggregate_chunks(chunks, |chunk| {
            let percent = ((chunk.index as f64 / total as f64) * 100.0) as u32;
            ctx.report_progress(
                "Transcribe",
                percent,
                &format!("Chunk {}/{}", chunk.index + 1, total),
            );
            client.transcribe_chunk(chunk)
        })?;

        tracing::info!(
            "{}: transcript assembled ({} chars from {} chunk(s))",
            ctx.item.display_name(),
            transcript.len(),
            total
        );
        state.transcript = Some(transcript);

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &ItemState) -> StepResult<()> {
        if !state.has_transcript() {
            return Err(StepError::invalid_output("Transcript not recorded"));
        }
        Ok(())
    }
}
