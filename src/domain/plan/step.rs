//! Plan step and plan document entities

use serde::{Deserialize, Serialize};

use crate::domain::workflow::WorkflowError;

/// One unit of work produced by the planner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    title: String,
    step_id: String,
    operation: String,
    params_template: String,
}

impl PlanStep {
    pub fn new(
        title: impl Into<String>,
        step_id: impl Into<String>,
        operation: impl Into<String>,
        params_template: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            step_id: step_id.into(),
            operation: operation.into(),
            params_template: params_template.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Variable token naming this step's output; empty when nothing refers to it
    pub fn step_id(&self) -> &str {
        &self.step_id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn params_template(&self) -> &str {
        &self.params_template
    }

    /// Check the fields every executable step needs
    pub fn validate(&self) -> Result<(), WorkflowError> {
        let missing = if self.title.trim().is_empty() {
            Some("title")
        } else if self.operation.trim().is_empty() {
            Some("operation name")
        } else if self.params_template.trim().is_empty() {
            Some("parameters")
        } else {
            None
        };

        match missing {
            Some(field) => Err(WorkflowError::plan_parse(format!(
                "Invalid plan step format: missing {} in step '{}'",
                field,
                if self.step_id.is_empty() {
                    self.operation.as_str()
                } else {
                    self.step_id.as_str()
                }
            ))),
            None => Ok(()),
        }
    }
}

/// Ordered, validated list of steps plus the text they were parsed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDocument {
    steps: Vec<PlanStep>,
    raw_text: String,
}

impl PlanDocument {
    /// Build a document; rejects empty plans and any structurally invalid step
    pub fn new(steps: Vec<PlanStep>, raw_text: impl Into<String>) -> Result<Self, WorkflowError> {
        if steps.is_empty() {
            return Err(WorkflowError::plan_parse(
                "No valid steps found in the generated plan",
            ));
        }

        for step in &steps {
            step.validate()?;
        }

        Ok(Self {
            steps,
            raw_text: raw_text.into(),
        })
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    pub fn get(&self, index: usize) -> Option<&PlanStep> {
        self.steps.get(index)
    }

    pub fn last_step(&self) -> Option<&PlanStep> {
        self.steps.last()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }
}
