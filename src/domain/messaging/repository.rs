//! Messaging repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{ChatMessage, Conversation, MessageFilter, NewMessage, Page, User};
use crate::domain::error::DomainError;

/// Storage for users, conversations and messages
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessagingRepository: Send + Sync + std::fmt::Debug {
    /// Finds a user by ID
    async fn find_user(&self, id: &str) -> Result<Option<User>, DomainError>;

    /// Users whose name contains `name`, case-insensitively
    async fn search_users_by_name(&self, name: &str) -> Result<Vec<User>, DomainError>;

    /// Creates a conversation between the given participants
    async fn create_conversation(
        &self,
        participants: Vec<String>,
    ) -> Result<Conversation, DomainError>;

    /// Finds a conversation by ID
    async fn find_conversation(&self, id: &str) -> Result<Option<Conversation>, DomainError>;

    /// First conversation that includes every one of `participants`
    async fn find_conversation_by_participants(
        &self,
        participants: &[String],
    ) -> Result<Option<Conversation>, DomainError>;

    /// Conversations the user takes part in
    async fn list_conversations_for(&self, user_id: &str)
        -> Result<Vec<Conversation>, DomainError>;

    /// Stores a new message
    async fn create_message(&self, message: NewMessage) -> Result<ChatMessage, DomainError>;

    /// Matching messages, newest first
    async fn list_messages(
        &self,
        filter: &MessageFilter,
        page: Page,
    ) -> Result<Vec<ChatMessage>, DomainError>;

    /// Number of matching messages
    async fn count_messages(&self, filter: &MessageFilter) -> Result<usize, DomainError>;
}
