//! Agent run request and response types

use serde::{Deserialize, Serialize};

use crate::domain::{OperationInfo, PlanStep, ResultMap, WorkflowState};

fn default_stream() -> bool {
    true
}

/// Body of `POST /v1/agent/runs`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    /// Natural-language instruction
    pub task: String,
    /// User on whose behalf operations run
    pub actor_id: String,
    /// Checkpoint key; generated when absent
    #[serde(default)]
    pub thread_id: Option<String>,
    /// Stream progress as server-sent events
    #[serde(default = "default_stream")]
    pub stream: bool,
}

impl RunRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.task.trim().is_empty() {
            return Err("task cannot be empty".to_string());
        }
        if self.actor_id.trim().is_empty() {
            return Err("actorId cannot be empty".to_string());
        }
        if self.thread_id.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err("threadId cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Body of `POST /v1/agent/runs/resume`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRequest {
    pub thread_id: String,
    #[serde(default = "default_stream")]
    pub stream: bool,
}

/// Outcome of a completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResponse {
    pub thread_id: String,
    pub answer: String,
    pub steps: Vec<PlanStep>,
    pub results: ResultMap,
}

impl RunResponse {
    pub fn from_state(thread_id: impl Into<String>, state: WorkflowState) -> Self {
        Self {
            thread_id: thread_id.into(),
            answer: state.final_answer.unwrap_or_default(),
            steps: state
                .plan
                .map(|plan| plan.steps().to_vec())
                .unwrap_or_default(),
            results: state.results,
        }
    }
}

/// Response of `GET /v1/operations`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationsResponse {
    pub operations: Vec<OperationInfo>,
}
