//! Pipeline runner that executes steps in sequence.

use super::errors::{PipelineError, PipelineResult};
use super::step::PipelineStep;
use super::types::{Context, ItemState, StepOutcome};

/// Pipeline that runs a sequence of steps.
///
/// The pipeline executes steps in order, running validation before and
/// after each step. Execution is strictly sequential; there is no
/// cancellation mechanism - once started, an item runs to completion
/// or terminal failure.
pub struct Pipeline {
    /// Steps to execute in order.
    steps: Vec<Box<dyn PipelineStep>>,
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Add a step to the pipeline.
    pub fn add_step<S: PipelineStep + 'static>(&mut self, step: S) -> &mut Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Add a step (builder pattern).
    pub fn with_step<S: PipelineStep + 'static>(mut self, step: S) -> Self {
        self.add_step(step);
        self
    }

    /// Run the pipeline with the given context and state.
    ///
    /// Executes each step in order:
    /// 1. Run `validate_input`
    /// 2. Run `execute`
    /// 3. Run `validate_output` (if execute returned Success)
    ///
    /// Returns the run result on success, or a `PipelineError` on the
    /// first failing step.
    pub fn run(&self, ctx: &Context, state: &mut ItemState) -> PipelineResult<PipelineRunResult> {
        let mut result = PipelineRunResult {
            steps_completed: Vec::new(),
            steps_skipped: Vec::new(),
        };

        let total_steps = self.steps.len();
        let item_name = ctx.item.display_name();

        for (i, step) in self.steps.iter().enumerate() {
            let step_name = step.name();

            let percent = ((i as f64 / total_steps as f64) * 100.0) as u32;
            ctx.report_progress(step_name, percent, &format!("Starting {}", step_name));

            tracing::debug!("[{}] Validating input for '{}'", item_name, step_name);
            if let Err(e) = step.validate_input(ctx) {
                tracing::error!("[{}] Input validation failed: {}", item_name, e);
                return Err(PipelineError::step_failed(&item_name, step_name, e));
            }

            tracing::debug!("[{}] Executing '{}'", item_name, step_name);
            let outcome = step.execute(ctx, state).map_err(|e| {
                tracing::error!("[{}] {} failed: {}", item_name, step_name, e);
                PipelineError::step_failed(&item_name, step_name, e)
            })?;

            match outcome {
                StepOutcome::Success => {
                    if let Err(e) = step.validate_output(ctx, state) {
                        tracing::error!("[{}] Output validation failed: {}", item_name, e);
                        return Err(PipelineError::step_failed(&item_name, step_name, e));
                    }
                    tracing::debug!("[{}] {} completed", item_name, step_name);
                    result.steps_completed.push(step_name.to_string());
                }
                StepOutcome::Skipped(reason) => {
                    tracing::info!("[{}] {} skipped: {}", item_name, step_name, reason);
                    result.steps_skipped.push(step_name.to_string());
                }
            }
        }

        ctx.report_progress("Complete", 100, "Pipeline finished");

        Ok(result)
    }

    /// Get the number of steps in the pipeline.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Get step names in order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRunResult {
    /// Steps that completed successfully.
    pub steps_completed: Vec<String>,
    /// Steps that were skipped.
    pub steps_skipped: Vec<String>,
}

impl PipelineRunResult {
    /// Check if all steps completed (none skipped).
    pub fn all_completed(&self) -> bool {
        self.steps_skipped.is_empty()
    }

    /// Total number of steps that ran.
    pub fn total_steps(&self) -> usize {
        self.steps_completed.len() + self.steps_skipped.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::orchestrator::errors::{StepError, StepResult};
    use crate::orchestrator::test_support::{test_context, NoopStt, NoopSummarizer, NoopTranscoder};

    struct CountingStep {
        name: &'static str,
        execute_count: Arc<AtomicUsize>,
    }

    impl PipelineStep for CountingStep {
        fn name(&self) -> &str {
            self.name
        }

        fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
            Ok(())
        }

        fn execute(&self, _ctx: &Context, _state: &mut ItemState) -> StepResult<StepOutcome> {
            self.execute_count.fetch_add(1, Ordering::SeqCst);
            Ok(StepOutcome::Success)
        }

        fn validate_output(&self, _ctx: &Context, _state: &ItemState) -> StepResult<()> {
            Ok(())
        }
    }

    struct FailingStep;

    impl PipelineStep for FailingStep {
        fn name(&self) -> &str {
            "Failing"
        }

        fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
            Ok(())
        }

        fn execute(&self, _ctx: &Context, _state: &mut ItemState) -> StepResult<StepOutcome> {
            Err(StepError::invalid_input("always fails"))
        }

        fn validate_output(&self, _ctx: &Context, _state: &ItemState) -> StepResult<()> {
            Ok(())
        }
    }

    #[test]
    fn pipeline_builds_correctly() {
        let pipeline = Pipeline::new()
            .with_step(CountingStep {
                name: "Step1",
                execute_count: Arc::new(AtomicUsize::new(0)),
            })
            .with_step(CountingStep {
                name: "Step2",
                execute_count: Arc::new(AtomicUsize::new(0)),
            });

        assert_eq!(pipeline.step_count(), 2);
        assert_eq!(pipeline.step_names(), vec!["Step1", "Step2"]);
    }

    #[test]
    fn pipeline_runs_steps_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let count1 = Arc::new(AtomicUsize::new(0));
        let count2 = Arc::new(AtomicUsize::new(0));

        let pipeline = Pipeline::new()
            .with_step(CountingStep {
                name: "First",
                execute_count: Arc::clone(&count1),
            })
            .with_step(CountingStep {
                name: "Second",
                execute_count: Arc::clone(&count2),
            });

        let ctx = test_context(
            dir.path(),
            Arc::new(NoopTranscoder),
            Arc::new(NoopStt),
            Arc::new(NoopSummarizer),
        );
        let mut state = ItemState::new("test");

        let result = pipeline.run(&ctx, &mut state).unwrap();
        assert_eq!(result.steps_completed, vec!["First", "Second"]);
        assert_eq!(count1.load(Ordering::SeqCst), 1);
        assert_eq!(count2.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failing_step_stops_the_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let after = Arc::new(AtomicUsize::new(0));

        let pipeline = Pipeline::new().with_step(FailingStep).with_step(CountingStep {
            name: "After",
            execute_count: Arc::clone(&after),
        });

        let ctx = test_context(
            dir.path(),
            Arc::new(NoopTranscoder),
            Arc::new(NoopStt),
            Arc::new(NoopSummarizer),
        );
        let mut state = ItemState::new("test");

        let err = pipeline.run(&ctx, &mut state).unwrap_err();
        assert!(err.to_string().contains("Failing"));
        assert_eq!(after.load(Ordering::SeqCst), 0);
    }
}
