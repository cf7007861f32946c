//! Operation registry

use std::sync::Arc;

use indexmap::IndexMap;

use super::entity::{Operation, OperationInfo};
use crate::domain::DomainError;

/// Reserved operation name meaning "send the template text to the language oracle"
pub const ORACLE_OPERATION: &str = "LLM";

/// Name-indexed set of operations, built once at startup and shared read-only
#[derive(Debug, Default, Clone)]
pub struct OperationRegistry {
    operations: IndexMap<String, Arc<dyn Operation>>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation; the reserved oracle name and duplicates are rejected
    pub fn register(&mut self, operation: Arc<dyn Operation>) -> Result<(), DomainError> {
        let name = operation.name().to_string();

        if name.trim().is_empty() {
            return Err(DomainError::validation("Operation name cannot be empty"));
        }

        if name == ORACLE_OPERATION {
            return Err(DomainError::validation(format!(
                "Operation name '{}' is reserved",
                ORACLE_OPERATION
            )));
        }

        if self.operations.contains_key(&name) {
            return Err(DomainError::conflict(format!(
                "Operation '{}' is already registered",
                name
            )));
        }

        self.operations.insert(name, operation);
        Ok(())
    }

    /// Builder-style registration
    pub fn with(mut self, operation: Arc<dyn Operation>) -> Result<Self, DomainError> {
        self.register(operation)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Operation>> {
        self.operations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Registered names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.operations.keys().map(String::as_str).collect()
    }

    pub fn catalog(&self) -> Vec<OperationInfo> {
        self.operations
            .values()
            .map(|operation| OperationInfo::of(operation.as_ref()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
