//! Messaging operations exposed to the planner
//!
//! Each operation is a thin adapter from typed, camelCase JSON parameters to
//! one or two [`MessagingRepository`] calls. Repository errors propagate so a
//! failed lookup aborts the run instead of feeding `null` into later steps.

mod conversations;
mod messages;
mod users;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

pub use conversations::{
    CreateNewConversation, FindConversationIdByParticipants, GetConversationStatistics,
    ListUserConversations,
};
pub use messages::{
    GetConversationMessagesBetweenUsers, GetLastSentMessages, GetMessagesByConversation,
    GetUserMessageStatistics, SearchUserMessages, SendMessage,
};
pub use users::{GetUserDetails, SearchUserByName};

use crate::domain::{DomainError, MessagingRepository, OperationRegistry};

/// Register the full messaging operation set.
///
/// `assistant_id` is the assistant's own account; messages addressed to it
/// are hidden from "last sent" queries.
pub fn register_messaging_operations(
    registry: &mut OperationRegistry,
    repository: Arc<dyn MessagingRepository>,
    assistant_id: impl Into<String>,
) -> Result<(), DomainError> {
    let assistant_id = assistant_id.into();
    let repo = || repository.clone();

    registry.register(Arc::new(SearchUserByName::new(repo())))?;
    registry.register(Arc::new(FindConversationIdByParticipants::new(repo())))?;
    registry.register(Arc::new(CreateNewConversation::new(repo())))?;
    registry.register(Arc::new(GetMessagesByConversation::new(repo())))?;
    registry.register(Arc::new(ListUserConversations::new(repo())))?;
    registry.register(Arc::new(GetLastSentMessages::new(repo(), assistant_id)))?;
    registry.register(Arc::new(GetConversationMessagesBetweenUsers::new(repo())))?;
    registry.register(Arc::new(SendMessage::new(repo())))?;
    registry.register(Arc::new(GetUserDetails::new(repo())))?;
    registry.register(Arc::new(GetUserMessageStatistics::new(repo())))?;
    registry.register(Arc::new(GetConversationStatistics::new(repo())))?;
    registry.register(Arc::new(SearchUserMessages::new(repo())))?;

    Ok(())
}

fn to_json<T: Serialize>(operation: &str, value: T) -> Result<Value, DomainError> {
    serde_json::to_value(value).map_err(|e| {
        DomainError::internal(format!("Failed to serialize '{}' output: {}", operation, e))
    })
}
