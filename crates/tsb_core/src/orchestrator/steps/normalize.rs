//! Normalize step - converts input media to the canonical audio format.
//!
//! Produces one normalized artifact in the scratch directory:
//! mono, 16 kHz, fixed bitrate MP3, with non-audio streams discarded.
//! Failure here means no artifact was produced and the item fails;
//! it is never classified as skipped.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, ItemState, StepOutcome};

/// Normalize step backed by the transcoding collaborator.
pub struct NormalizeStep;

impl NormalizeStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NormalizeStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for NormalizeStep {
    fn name(&self) -> &str {
        "Normalize"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if !ctx.item.path.is_file() {
            return Err(StepError::invalid_input(format!(
                "Input file not found: {}",
                ctx.item.path.display()
            )));
        }
        if !ctx.scratch_dir.is_dir() {
            return Err(StepError::invalid_input(format!(
                "Scratch directory missing: {}",
                ctx.scratch_dir.display()
            )));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut ItemState) -> StepResult<StepOutcome> {
        let output = ctx
            .scratch_dir
            .join(format!("{}_for_api.mp3", ctx.item.stem));

        tracing::info!(
            "Re-encoding {} to mono {} Hz MP3 ({} kbps)",
            ctx.item.display_name(),
            ctx.settings.transcription.sample_rate_hz,
            ctx.settings.transcription.bitrate_kbps
        );

        let normalized = ctx.collaborators.transcoder.normalize(&ctx.item.path, &output)?;
        state.normalized = Some(normalized);

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &ItemState) -> StepResult<()> {
        let normalized = state
            .normalized
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("Normalized audio not recorded"))?;

        if !normalized.path.is_file() || normalized.size_bytes == 0 {
            return Err(StepError::invalid_output(format!(
                "Normalized artifact missing or empty: {}",
                normalized.path.display()
            )));
        }
        Ok(())
    }
}
