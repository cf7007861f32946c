//! Plan → Tool* → Solve state machine

use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use serde_json::json;
use tracing::{debug, info, warn};

use super::checkpoint::CheckpointStore;
use super::dispatcher::StepDispatcher;
use super::error::WorkflowError;
use super::oracle::{PlanningOracle, SolverOracle};
use super::progress::ProgressSink;
use super::solver::{SolverInput, SolverRequest};
use super::state::{WorkflowStage, WorkflowState};
use super::task::Task;
use crate::domain::operation::OperationContext;
use crate::domain::plan::parse_plan;

/// Configuration for the workflow executor
#[derive(Debug, Clone, Default)]
pub struct WorkflowExecutorConfig {
    /// Which recorded result feeds the solver
    pub solver_input: SolverInput,
}

/// Drives a task through planning, step execution and synthesis
pub struct WorkflowExecutor {
    planner: Arc<dyn PlanningOracle>,
    dispatcher: StepDispatcher,
    solver: Arc<dyn SolverOracle>,
    checkpoints: Option<Arc<dyn CheckpointStore>>,
    config: WorkflowExecutorConfig,
}

impl std::fmt::Debug for WorkflowExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowExecutor")
            .field("dispatcher", &self.dispatcher)
            .field("checkpoints", &self.checkpoints.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl WorkflowExecutor {
    pub fn new(
        planner: Arc<dyn PlanningOracle>,
        dispatcher: StepDispatcher,
        solver: Arc<dyn SolverOracle>,
    ) -> Self {
        Self {
            planner,
            dispatcher,
            solver,
            checkpoints: None,
            config: WorkflowExecutorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: WorkflowExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Persist state after every successful transition
    pub fn with_checkpoints(mut self, store: Arc<dyn CheckpointStore>) -> Self {
        self.checkpoints = Some(store);
        self
    }

    pub fn dispatcher(&self) -> &StepDispatcher {
        &self.dispatcher
    }

    /// Run a new task to completion
    pub async fn run(&self, thread_id: &str, task: Task) -> Result<WorkflowState, WorkflowError> {
        info!(thread_id = %thread_id, actor_id = %task.actor_id(), "Starting workflow run");
        self.drive(thread_id, WorkflowState::new(task)).await
    }

    /// Continue the checkpointed run of `thread_id`, if there is one
    pub async fn resume(
        &self,
        thread_id: &str,
        sink: Option<Arc<dyn ProgressSink>>,
    ) -> Result<Option<WorkflowState>, WorkflowError> {
        let Some(state) = self.claim(thread_id).await? else {
            return Ok(None);
        };

        self.resume_claimed(thread_id, state, sink).await.map(Some)
    }

    /// Claim the checkpoint of `thread_id` so no other caller can resume it
    pub async fn claim(&self, thread_id: &str) -> Result<Option<WorkflowState>, WorkflowError> {
        let Some(store) = &self.checkpoints else {
            return Ok(None);
        };

        store
            .claim(thread_id)
            .await
            .map_err(WorkflowError::Checkpoint)
    }

    /// Drive a claimed state; the claim is released if the run fails again
    pub async fn resume_claimed(
        &self,
        thread_id: &str,
        mut state: WorkflowState,
        sink: Option<Arc<dyn ProgressSink>>,
    ) -> Result<WorkflowState, WorkflowError> {
        info!(
            thread_id = %thread_id,
            stage = state.stage.as_str(),
            cursor = state.cursor,
            "Resuming workflow run"
        );

        state.task.set_sink(sink);
        let result = self.drive(thread_id, state).await;

        if result.is_err() {
            if let Some(store) = &self.checkpoints {
                if let Err(e) = store.release(thread_id).await {
                    warn!(thread_id = %thread_id, error = %e, "Failed to release checkpoint claim");
                }
            }
        }

        result
    }

    /// Run transitions from an existing state until `Done` or an error
    pub async fn drive(
        &self,
        thread_id: &str,
        mut state: WorkflowState,
    ) -> Result<WorkflowState, WorkflowError> {
        let start = Instant::now();

        while !state.is_done() {
            if let Err(err) = self.advance(&mut state).await {
                warn!(
                    thread_id = %thread_id,
                    stage = state.stage.as_str(),
                    phase = ?err.phase(),
                    error = %err,
                    "Workflow run failed"
                );
                record_run("error", start);
                return Err(err);
            }

            self.checkpoint(thread_id, &state).await?;
        }

        info!(
            thread_id = %thread_id,
            steps = state.cursor,
            duration_ms = start.elapsed().as_millis() as u64,
            "Workflow run completed"
        );
        record_run("success", start);

        Ok(state)
    }

    /// Execute exactly one transition
    pub async fn advance(&self, state: &mut WorkflowState) -> Result<(), WorkflowError> {
        match state.stage {
            WorkflowStage::Plan => self.plan(state).await,
            WorkflowStage::Tool => self.tool(state).await,
            WorkflowStage::Solve => self.solve(state).await,
            WorkflowStage::Done => Err(WorkflowError::routing("Run already finished")),
        }
    }

    async fn plan(&self, state: &mut WorkflowState) -> Result<(), WorkflowError> {
        let raw = self
            .planner
            .generate_plan(&state.task)
            .await
            .map_err(WorkflowError::Planning)?;

        let plan = parse_plan(&raw)?;
        debug!(steps = plan.len(), "Plan parsed");

        state.task.sink().on_plan(&plan);
        state.plan = Some(plan);
        state.stage = WorkflowStage::Tool;
        Ok(())
    }

    async fn tool(&self, state: &mut WorkflowState) -> Result<(), WorkflowError> {
        let index = state.cursor;
        let step = state.current_step()?.clone();
        let context = OperationContext::new(state.task.actor_id());

        let result = self
            .dispatcher
            .execute(&step, &mut state.results, &context, state.task.sink())
            .await;

        let output = match result {
            Ok(output) => {
                counter!(
                    "workflow_steps_total",
                    "operation" => step.operation().to_string(),
                    "status" => "success"
                )
                .increment(1);
                output
            }
            Err(source) => {
                counter!(
                    "workflow_steps_total",
                    "operation" => step.operation().to_string(),
                    "status" => "error"
                )
                .increment(1);
                return Err(WorkflowError::step(index + 1, step.step_id(), source));
            }
        };

        state.task.sink().on_step_event(
            step.step_id(),
            &json!({
                "index": index + 1,
                "title": step.title(),
                "operation": step.operation(),
                "result": output,
            }),
        );

        state.cursor += 1;
        state.stage = state.route_after_tool()?;
        Ok(())
    }

    async fn solve(&self, state: &mut WorkflowState) -> Result<(), WorkflowError> {
        let plan = state
            .plan
            .as_ref()
            .ok_or_else(|| WorkflowError::routing("Solve stage entered without a plan"))?;

        let request = SolverRequest::build(
            state.task.instruction(),
            plan,
            &state.results,
            self.config.solver_input,
        );

        let answer = self
            .solver
            .synthesize(&request, state.task.sink())
            .await
            .map_err(WorkflowError::Solver)?;

        state.final_answer = Some(answer);
        state.stage = WorkflowStage::Done;
        Ok(())
    }

    async fn checkpoint(&self, thread_id: &str, state: &WorkflowState) -> Result<(), WorkflowError> {
        let Some(store) = &self.checkpoints else {
            return Ok(());
        };

        if state.is_done() {
            store
                .delete(thread_id)
                .await
                .map_err(WorkflowError::Checkpoint)?;
        } else {
            store
                .save(thread_id, state)
                .await
                .map_err(WorkflowError::Checkpoint)?;
        }

        Ok(())
    }
}

fn record_run(status: &'static str, start: Instant) {
    counter!("workflow_runs_total", "status" => status).increment(1);
    histogram!("workflow_run_duration_seconds", "status" => status)
        .record(start.elapsed().as_secs_f64());
}
