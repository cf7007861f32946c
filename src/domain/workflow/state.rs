//! Workflow state and stage routing

use serde::{Deserialize, Serialize};

use super::error::WorkflowError;
use super::results::ResultMap;
use super::task::Task;
use crate::domain::plan::{PlanDocument, PlanStep};

/// Stage the run will execute next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    Plan,
    Tool,
    Solve,
    Done,
}

impl WorkflowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plan => "plan",
            Self::Tool => "tool",
            Self::Solve => "solve",
            Self::Done => "done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Everything a run knows, exclusively owned by that run
///
/// `cursor` counts completed steps and is the only progress marker; the
/// result map is used for variable lookup and solver input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    pub task: Task,
    pub stage: WorkflowStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanDocument>,
    #[serde(default)]
    pub results: ResultMap,
    #[serde(default)]
    pub cursor: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_answer: Option<String>,
}

impl WorkflowState {
    pub fn new(task: Task) -> Self {
        Self {
            task,
            stage: WorkflowStage::Plan,
            plan: None,
            results: ResultMap::new(),
            cursor: 0,
            final_answer: None,
        }
    }

    /// Next step to execute, validated against the plan
    pub fn current_step(&self) -> Result<&PlanStep, WorkflowError> {
        let plan = self
            .plan
            .as_ref()
            .filter(|plan| !plan.is_empty())
            .ok_or_else(|| WorkflowError::routing("Tool stage entered without plan steps"))?;

        plan.get(self.cursor).ok_or_else(|| {
            WorkflowError::routing(format!(
                "Cursor {} is past the last of {} plan steps",
                self.cursor,
                plan.len()
            ))
        })
    }

    /// Stage that follows a completed `Tool` transition
    pub fn route_after_tool(&self) -> Result<WorkflowStage, WorkflowError> {
        let total = self
            .plan
            .as_ref()
            .map(PlanDocument::len)
            .ok_or_else(|| WorkflowError::routing("No plan recorded after tool execution"))?;

        if self.cursor >= total {
            Ok(WorkflowStage::Solve)
        } else {
            Ok(WorkflowStage::Tool)
        }
    }

    pub fn steps_total(&self) -> usize {
        self.plan.as_ref().map_or(0, PlanDocument::len)
    }

    pub fn is_done(&self) -> bool {
        self.stage.is_terminal()
    }
}
