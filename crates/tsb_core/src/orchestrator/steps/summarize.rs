//! Summarize step - invokes the summarization collaborator.
//!
//! Summarization failure is non-fatal: the transcript is already
//! persisted, so the failure is recorded in the state and the step
//! reports itself skipped. The batch runner downgrades the item to
//! partially processed instead of failed.

use std::fs;

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, ItemState, StepOutcome};

/// Summarize step for the persisted transcript.
pub struct SummarizeStep;

impl SummarizeStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SummarizeStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for SummarizeStep {
    fn name(&self) -> &str {
        "Summarize"
    }

    fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut ItemState) -> StepResult<StepOutcome> {
        let transcript = state
            .transcript
            .as_deref()
            .ok_or_else(|| StepError::precondition_failed("Transcribe step has not run"))?;

        let summary = match ctx
            .collaborators
            .summarizer
            .summarize(&ctx.collaborators.system_prompt, transcript)
        {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("{}: summarization failed: {}", ctx.item.display_name(), e);
                state.summary_error = Some(e.to_string());
                return Ok(StepOutcome::Skipped(format!("summarization failed: {}", e)));
            }
        };

        if let Err(e) = fs::write(&ctx.summary_path, &summary) {
            tracing::warn!(
                "{}: failed to write summary {}: {}",
                ctx.item.display_name(),
                ctx.summary_path.display(),
                e
            );
            state.summary_error = Some(e.to_string());
            return Ok(StepOutcome::Skipped(format!("summary write failed: {}", e)));
        }

        tracing::info!("Summary written: {}", ctx.summary_path.display());
        state.summary_path = Some(ctx.summary_path.clone());

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, state: &ItemState) -> StepResult<()> {
        if state.summary_path.is_some() && !ctx.summary_path.is_file() {
            return Err(StepError::invalid_output(format!(
                "Summary file missing: {}",
                ctx.summary_path.display()
            )));
        }
        Ok(())
    }
}
