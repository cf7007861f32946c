//! Step dispatcher
//!
//! Executes exactly one plan step: either a literal prompt to the language
//! oracle or a registered operation with JSON parameters.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::error::StepError;
use super::oracle::LanguageOracle;
use super::progress::ProgressSink;
use super::resolver::resolve;
use super::results::ResultMap;
use crate::domain::operation::{OperationContext, OperationRegistry, ORACLE_OPERATION};
use crate::domain::plan::PlanStep;
use crate::domain::DomainError;

/// Runs plan steps against the operation registry and the language oracle
#[derive(Clone)]
pub struct StepDispatcher {
    registry: Arc<OperationRegistry>,
    oracle: Arc<dyn LanguageOracle>,
}

impl std::fmt::Debug for StepDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepDispatcher")
            .field("operations", &self.registry.names())
            .finish()
    }
}

impl StepDispatcher {
    pub fn new(registry: Arc<OperationRegistry>, oracle: Arc<dyn LanguageOracle>) -> Self {
        Self { registry, oracle }
    }

    pub fn registry(&self) -> &Arc<OperationRegistry> {
        &self.registry
    }

    /// Execute `step`, recording its serialized output under the step id.
    ///
    /// `results` is only written on success, so a failed step can be
    /// dispatched again with the same map.
    pub async fn execute(
        &self,
        step: &PlanStep,
        results: &mut ResultMap,
        context: &OperationContext,
        sink: &dyn ProgressSink,
    ) -> Result<String, StepError> {
        let operation_name = step.operation();
        let input = resolve(step.params_template(), results);

        debug!(
            step_id = %step.step_id(),
            operation = %operation_name,
            "Dispatching plan step"
        );

        let value = if operation_name == ORACLE_OPERATION {
            let text = self
                .oracle
                .complete(&input, sink)
                .await
                .map_err(|e| StepError::operation_execution(operation_name, e))?;
            Value::String(text)
        } else if let Some(operation) = self.registry.get(operation_name) {
            let params: Value = serde_json::from_str(&input)
                .map_err(|e| StepError::param_parse(operation_name, &input, e.to_string()))?;

            let output = operation
                .invoke(params, context)
                .await
                .map_err(|e| StepError::operation_execution(operation_name, e))?;
            extract_content(output)
        } else {
            return Err(StepError::unknown_operation(operation_name));
        };

        let serialized = serde_json::to_string_pretty(&value).map_err(|e| {
            StepError::operation_execution(
                operation_name,
                DomainError::internal(format!("Failed to serialize result: {}", e)),
            )
        })?;

        results.insert(step.step_id(), serialized.clone());
        Ok(serialized)
    }
}

/// Unwrap a `content` field when the output carries one
fn extract_content(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("content") => {
            map.remove("content").unwrap_or(Value::Null)
        }
        other => other,
    }
}
