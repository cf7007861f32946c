//! Solver input shaping

use serde::{Deserialize, Serialize};

use super::results::ResultMap;
use crate::domain::plan::PlanDocument;

/// Which recorded result is handed to the solver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverInput {
    /// Value under the most recently inserted step id
    #[default]
    LastInserted,
    /// Value recorded for the last step of the plan
    LastPlanStep,
}

/// Synthesis request sent to the solver oracle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverRequest {
    task: String,
    last_result: Option<String>,
}

impl SolverRequest {
    pub fn new(task: impl Into<String>, last_result: Option<String>) -> Self {
        Self {
            task: task.into(),
            last_result,
        }
    }

    /// Build the request from the finished run
    pub fn build(
        task: &str,
        plan: &PlanDocument,
        results: &ResultMap,
        input: SolverInput,
    ) -> Self {
        let last_result = match input {
            SolverInput::LastInserted => results.last_inserted().map(|(_, value)| value),
            SolverInput::LastPlanStep => plan
                .last_step()
                .and_then(|step| results.get(step.step_id())),
        };

        Self::new(task, last_result.map(str::to_string))
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn last_result(&self) -> Option<&str> {
        self.last_result.as_deref()
    }
}
