//! Operation contract

use std::fmt;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::DomainError;

/// Caller-derived context passed to every invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationContext {
    actor_id: String,
}

impl OperationContext {
    pub fn new(actor_id: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
        }
    }

    /// Actor on whose behalf the operation runs
    pub fn actor_id(&self) -> &str {
        &self.actor_id
    }
}

/// A named capability the dispatcher can invoke with structured parameters
#[async_trait]
pub trait Operation: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the parameter object
    fn parameters_schema(&self) -> Value;

    async fn invoke(&self, params: Value, context: &OperationContext)
        -> Result<Value, DomainError>;
}

/// Catalog entry describing a registered operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationInfo {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl OperationInfo {
    pub fn of(operation: &dyn Operation) -> Self {
        Self {
            name: operation.name().to_string(),
            description: operation.description().to_string(),
            parameters: operation.parameters_schema(),
        }
    }
}

/// JSON schema for a parameter type
pub fn params_schema<T: JsonSchema>() -> Value {
    serde_json::to_value(schemars::schema_for!(T)).unwrap_or(Value::Null)
}

/// Decode an operation's parameter object into its typed form
pub fn parse_params<T: DeserializeOwned>(operation: &str, params: Value) -> Result<T, DomainError> {
    serde_json::from_value(params).map_err(|e| {
        DomainError::validation(format!("Invalid parameters for '{}': {}", operation, e))
    })
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, JsonSchema)]
    #[serde(rename_all = "camelCase")]
    struct LookupParams {
        /// Name to search for
        user_name: String,
        #[serde(default)]
        limit: Option<u32>,
    }

    #[test]
    fn test_parse_params() {
        let params: LookupParams =
            parse_params("Lookup", json!({"userName": "Ann", "limit": 2})).unwrap();

        assert_eq!(params.user_name, "Ann");
        assert_eq!(params.limit, Some(2));
    }

    #[test]
    fn test_parse_params_rejects_wrong_shape() {
        let result = parse_params::<LookupParams>("Lookup", json!({"limit": "two"}));
        let err = result.unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(err.to_string().contains("Lookup"));
    }

    #[test]
    fn test_params_schema_lists_properties() {
        let schema = params_schema::<LookupParams>();

        assert!(schema["properties"]["userName"].is_object());
        assert_eq!(schema["required"], json!(["userName"]));
    }

    #[tokio::test]
    async fn test_operation_info_of_mock() {
        let op = mock::FnOperation::returning("Lookup", json!("u-42"));
        let info = OperationInfo::of(&op);

        assert_eq!(info.name, "Lookup");
        let value = op
            .invoke(json!({}), &OperationContext::new("u-1"))
            .await
            .unwrap();
        assert_eq!(value, json!("u-42"));
    }
}
