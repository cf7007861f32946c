//! In-memory messaging repository implementation

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use super::seed::MessagingSeed;
use crate::domain::{
    ChatMessage, Conversation, DomainError, MessageFilter, MessagingRepository, NewMessage, Page,
    User,
};

#[derive(Debug, Default)]
struct Store {
    users: IndexMap<String, User>,
    conversations: IndexMap<String, Conversation>,
    messages: Vec<ChatMessage>,
}

/// In-memory implementation of MessagingRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessagingRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryMessagingRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated from a seed
    pub fn with_seed(seed: MessagingSeed) -> Self {
        let store = Store {
            users: seed
                .users
                .into_iter()
                .map(|user| (user.id.clone(), user))
                .collect(),
            conversations: seed
                .conversations
                .into_iter()
                .map(|conversation| (conversation.id.clone(), conversation))
                .collect(),
            messages: seed.messages,
        };

        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    pub async fn add_user(&self, user: User) {
        let mut store = self.store.write().await;
        store.users.insert(user.id.clone(), user);
    }
}

#[async_trait]
impl MessagingRepository for InMemoryMessagingRepository {
    async fn find_user(&self, id: &str) -> Result<Option<User>, DomainError> {
        let store = self.store.read().await;
        Ok(store.users.get(id).cloned())
    }

    async fn search_users_by_name(&self, name: &str) -> Result<Vec<User>, DomainError> {
        let needle = name.to_lowercase();
        let store = self.store.read().await;

        Ok(store
            .users
            .values()
            .filter(|user| user.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn create_conversation(
        &self,
        participants: Vec<String>,
    ) -> Result<Conversation, DomainError> {
        if participants.is_empty() {
            return Err(DomainError::validation(
                "A conversation needs at least one participant",
            ));
        }

        let conversation = Conversation::new(participants);
        let mut store = self.store.write().await;
        store
            .conversations
            .insert(conversation.id.clone(), conversation.clone());

        Ok(conversation)
    }

    async fn find_conversation(&self, id: &str) -> Result<Option<Conversation>, DomainError> {
        let store = self.store.read().await;
        Ok(store.conversations.get(id).cloned())
    }

    async fn find_conversation_by_participants(
        &self,
        participants: &[String],
    ) -> Result<Option<Conversation>, DomainError> {
        let store = self.store.read().await;
        Ok(store
            .conversations
            .values()
            .find(|conversation| conversation.has_every(participants))
            .cloned())
    }

    async fn list_conversations_for(
        &self,
        user_id: &str,
    ) -> Result<Vec<Conversation>, DomainError> {
        let store = self.store.read().await;
        Ok(store
            .conversations
            .values()
            .filter(|conversation| conversation.has_participant(user_id))
            .cloned()
            .collect())
    }

    async fn create_message(&self, message: NewMessage) -> Result<ChatMessage, DomainError> {
        let mut store = self.store.write().await;

        if !store.conversations.contains_key(&message.conversation_id) {
            return Err(DomainError::not_found(format!(
                "Conversation '{}' not found",
                message.conversation_id
            )));
        }

        let message = message.into_message();
        store.messages.push(message.clone());
        Ok(message)
    }

    async fn list_messages(
        &self,
        filter: &MessageFilter,
        page: Page,
    ) -> Result<Vec<ChatMessage>, DomainError> {
        let store = self.store.read().await;

        let mut matching: Vec<&ChatMessage> = store
            .messages
            .iter()
            .filter(|message| filter.matches(message))
            .collect();
        // Stable sort keeps later insertions first among equal timestamps
        matching.reverse();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(page.offset)
            .take(page.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count_messages(&self, filter: &MessageFilter) -> Result<usize, DomainError> {
        let store = self.store.read().await;
        Ok(store
            .messages
            .iter()
            .filter(|message| filter.matches(message))
            .count())
    }
}
