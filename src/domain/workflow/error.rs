//! Workflow error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::DomainError;

/// Coarse phase in which a run failed, as reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPhase {
    Planning,
    Execution,
    Synthesis,
    Internal,
}

/// Failure of a single plan step inside the dispatcher
#[derive(Debug, Error)]
pub enum StepError {
    #[error("Invalid JSON input for operation '{operation}'. Input: {input}")]
    ParamParse {
        operation: String,
        input: String,
        message: String,
    },

    #[error("Unsupported operation: {operation}")]
    UnknownOperation { operation: String },

    #[error("Operation '{operation}' failed: {source}")]
    OperationExecution {
        operation: String,
        #[source]
        source: DomainError,
    },
}

impl StepError {
    pub fn param_parse(
        operation: impl Into<String>,
        input: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ParamParse {
            operation: operation.into(),
            input: input.into(),
            message: message.into(),
        }
    }

    pub fn unknown_operation(operation: impl Into<String>) -> Self {
        Self::UnknownOperation {
            operation: operation.into(),
        }
    }

    pub fn operation_execution(operation: impl Into<String>, source: DomainError) -> Self {
        Self::OperationExecution {
            operation: operation.into(),
            source,
        }
    }

    /// Name of the operation the failing step referenced
    pub fn operation(&self) -> &str {
        match self {
            Self::ParamParse { operation, .. }
            | Self::UnknownOperation { operation }
            | Self::OperationExecution { operation, .. } => operation,
        }
    }
}

/// Terminal errors of a plan-execute-solve run
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Failed to generate plan: {0}")]
    Planning(#[source] DomainError),

    #[error("Plan parsing failed: {0}")]
    PlanParse(String),

    #[error("Step {index} ({step_id}) failed: {source}")]
    Step {
        index: usize,
        step_id: String,
        #[source]
        source: StepError,
    },

    #[error("Failed to synthesize answer: {0}")]
    Solver(#[source] DomainError),

    #[error("Workflow routing failed: {0}")]
    Routing(String),

    #[error("Checkpoint store failed: {0}")]
    Checkpoint(#[source] DomainError),
}

impl WorkflowError {
    pub fn plan_parse(message: impl Into<String>) -> Self {
        Self::PlanParse(message.into())
    }

    pub fn routing(message: impl Into<String>) -> Self {
        Self::Routing(message.into())
    }

    /// Wrap a dispatcher failure with the 1-based position of the step
    pub fn step(index: usize, step_id: impl Into<String>, source: StepError) -> Self {
        Self::Step {
            index,
            step_id: step_id.into(),
            source,
        }
    }

    pub fn phase(&self) -> ErrorPhase {
        match self {
            Self::Planning(_) | Self::PlanParse(_) => ErrorPhase::Planning,
            Self::Step { .. } => ErrorPhase::Execution,
            Self::Solver(_) => ErrorPhase::Synthesis,
            Self::Routing(_) | Self::Checkpoint(_) => ErrorPhase::Internal,
        }
    }

    /// 1-based index of the failed step, if the run failed while executing one
    pub fn failed_step(&self) -> Option<usize> {
        match self {
            Self::Step { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub fn step_error(&self) -> Option<&StepError> {
        match self {
            Self::Step { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WorkflowError::plan_parse("No valid steps found in the generated plan");
        assert_eq!(
            err.to_string(),
            "Plan parsing failed: No valid steps found in the generated plan"
        );

        let err = WorkflowError::step(2, "#E2", StepError::unknown_operation("Teleport"));
        assert_eq!(
            err.to_string(),
            "Step 2 (#E2) failed: Unsupported operation: Teleport"
        );
    }

    #[test]
    fn test_phases_are_distinct() {
        assert_eq!(
            WorkflowError::plan_parse("x").phase(),
            ErrorPhase::Planning
        );
        assert_eq!(
            WorkflowError::Planning(DomainError::provider("mock", "down")).phase(),
            ErrorPhase::Planning
        );
        assert_eq!(
            WorkflowError::step(1, "#E1", StepError::unknown_operation("X")).phase(),
            ErrorPhase::Execution
        );
        assert_eq!(
            WorkflowError::Solver(DomainError::provider("mock", "down")).phase(),
            ErrorPhase::Synthesis
        );
        assert_eq!(WorkflowError::routing("x").phase(), ErrorPhase::Internal);
    }

    #[test]
    fn test_failed_step_and_source() {
        let err = WorkflowError::step(
            3,
            "#E3",
            StepError::operation_execution("SendMessage", DomainError::not_found("conversation")),
        );

        assert_eq!(err.failed_step(), Some(3));
        assert_eq!(err.step_error().map(|e| e.operation()), Some("SendMessage"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_param_parse_names_operation_and_input() {
        let err = StepError::param_parse("Lookup", "{\"name\": ", "EOF while parsing");
        let text = err.to_string();

        assert!(text.contains("Lookup"));
        assert!(text.contains("{\"name\": "));
    }
}
