//! Checkpoint store trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::state::WorkflowState;
use crate::domain::DomainError;

/// Persists workflow state between transitions, keyed by thread id
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    async fn save(&self, thread_id: &str, state: &WorkflowState) -> Result<(), DomainError>;

    async fn load(&self, thread_id: &str) -> Result<Option<WorkflowState>, DomainError>;

    /// Take exclusive ownership of a checkpoint for resuming.
    ///
    /// Returns `Ok(None)` when there is nothing to resume and
    /// `DomainError::Conflict` while another caller holds the claim.
    async fn claim(&self, thread_id: &str) -> Result<Option<WorkflowState>, DomainError>;

    /// Give up a claim so the checkpoint can be resumed again
    async fn release(&self, thread_id: &str) -> Result<(), DomainError>;

    /// Remove the checkpoint; returns whether one existed
    async fn delete(&self, thread_id: &str) -> Result<bool, DomainError>;
}
