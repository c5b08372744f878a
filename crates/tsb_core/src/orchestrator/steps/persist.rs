//! Persist step - writes the assembled transcript to its target path.
//!
//! The transcript file doubles as the idempotency signal: its presence
//! makes any later run skip this item.

use std::fs;

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, ItemState, StepOutcome};

/// Persist step for the transcript file.
pub struct PersistStep;

impl PersistStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PersistStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for PersistStep {
    fn name(&self) -> &str {
        "Persist"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        match ctx.transcript_path.parent() {
            Some(parent) if parent.is_dir() => Ok(()),
            Some(parent) => Err(StepError::invalid_input(format!(
                "Output directory missing: {}",
                parent.display()
            ))),
            None => Ok(()),
        }
    }

    fn execute(&self, ctx: &Context, state: &mut ItemState) -> StepResult<StepOutcome> {
        let transcript = state
            .transcript
            .as_deref()
            .ok_or_else(|| StepError::precondition_failed("Transcribe step has not run"))?;

        fs::write(&ctx.transcript_path, transcript)
            .map_err(|e| StepError::io_error("writing transcript", e))?;

        tracing::info!("Transcript written: {}", ctx.transcript_path.display());
        state.transcript_path = Some(ctx.transcript_path.clone());

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, _state: &ItemState) -> StepResult<()> {
        if !ctx.transcript_path.is_file() {
            return Err(StepError::invalid_output(format!(
                "Transcript file missing: {}",
                ctx.transcript_path.display()
            )));
        }
        Ok(())
    }
}
