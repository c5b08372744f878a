//! Plan step - decides the chunk sequence for the normalized artifact.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, ItemState, StepOutcome};
use crate::planner::{self, ChunkLimits};

/// Plan step driving the chunk planner.
pub struct PlanStep;

impl PlanStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlanStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for PlanStep {
    fn name(&self) -> &str {
        "Plan"
    }

    fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut ItemState) -> StepResult<StepOutcome> {
        let normalized = state
            .normalized
            .as_ref()
            .ok_or_else(|| StepError::precondition_failed("Normalize step has not run"))?;

        let limits = ChunkLimits::from_settings(&ctx.settings);
        let chunks = planner::plan_chunks(
            ctx.collaborators.transcoder.as_ref(),
            normalized,
            &limits,
            &ctx.item.stem,
        )?;

        tracing::info!(
            "{}: {} chunk(s) planned",
            ctx.item.display_name(),
            chunks.len()
        );
        state.chunks = Some(chunks);

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &ItemState) -> StepResult<()> {
        match &state.chunks {
            Some(chunks) if !chunks.is_empty() => Ok(()),
            _ => Err(StepError::invalid_output("No chunks planned")),
        }
    }
}
