//! Suggested replies for the latest turn of a conversation

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;

use super::entity::{ChatMessage, MessageFilter, Page};
use super::repository::MessagingRepository;
use crate::domain::error::DomainError;

/// Offered when the model cannot produce usable suggestions
pub const FALLBACK_REPLIES: [&str; 3] = ["Vibe check failed", "Tea's cold now", "You good, fam?"];

/// One message with its sender replaced by a stable pseudonym
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationLine {
    pub sender: String,
    pub message: String,
}

impl ConversationLine {
    /// Pseudonymize senders as `user1`, `user2`, ... in order of first appearance
    pub fn anonymize(messages: &[ChatMessage]) -> Vec<Self> {
        let mut aliases: HashMap<&str, String> = HashMap::new();

        messages
            .iter()
            .map(|message| {
                let next = aliases.len() + 1;
                let sender = aliases
                    .entry(message.sender_id.as_str())
                    .or_insert_with(|| format!("user{}", next))
                    .clone();

                Self {
                    sender,
                    message: message.content.clone(),
                }
            })
            .collect()
    }
}

/// Produces candidate replies; implementations never fail, they fall back
#[async_trait]
pub trait ReplySuggester: Send + Sync {
    async fn suggest(&self, conversation: &[ConversationLine]) -> Vec<String>;
}

/// Looks up the recent part of a conversation and asks for reply suggestions
#[derive(Clone)]
pub struct SmartReplies {
    repository: Arc<dyn MessagingRepository>,
    suggester: Arc<dyn ReplySuggester>,
    window: Duration,
}

impl std::fmt::Debug for SmartReplies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartReplies")
            .field("window", &self.window)
            .finish()
    }
}

impl SmartReplies {
    pub fn new(
        repository: Arc<dyn MessagingRepository>,
        suggester: Arc<dyn ReplySuggester>,
    ) -> Self {
        Self {
            repository,
            suggester,
            window: Duration::from_secs(300),
        }
    }

    /// Only messages newer than `window` are shown to the model
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub async fn for_conversation(&self, conversation_id: &str) -> Result<Vec<String>, DomainError> {
        if self
            .repository
            .find_conversation(conversation_id)
            .await?
            .is_none()
        {
            return Err(DomainError::not_found(format!(
                "Conversation '{}' not found",
                conversation_id
            )));
        }

        let window = chrono::Duration::from_std(self.window)
            .map_err(|e| DomainError::configuration(format!("Invalid reply window: {}", e)))?;
        let filter = MessageFilter::new()
            .conversation(conversation_id)
            .since(Utc::now() - window);

        let mut messages = self.repository.list_messages(&filter, Page::all()).await?;
        messages.reverse();

        let conversation = ConversationLine::anonymize(&messages);
        Ok(self.suggester.suggest(&conversation).await)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::messaging::entity::{Conversation, NewMessage};
    use crate::domain::messaging::repository::MockMessagingRepository;

    #[derive(Default)]
    struct CapturingSuggester {
        seen: Mutex<Vec<ConversationLine>>,
    }

    #[async_trait]
    impl ReplySuggester for CapturingSuggester {
        async fn suggest(&self, conversation: &[ConversationLine]) -> Vec<String> {
            if let Ok(mut seen) = self.seen.lock() {
                *seen = conversation.to_vec();
            }
            vec!["ok".to_string()]
        }
    }

    fn message(sender: &str, content: &str) -> ChatMessage {
        NewMessage {
            conversation_id: "c-1".to_string(),
            sender_id: sender.to_string(),
            receiver_id: "x".to_string(),
            content: content.to_string(),
        }
        .into_message()
    }

    #[test]
    fn test_anonymize_senders_in_order() {
        let lines = ConversationLine::anonymize(&[
            message("u-bob", "hey"),
            message("u-ann", "hi"),
            message("u-bob", "lunch?"),
        ]);

        let senders: Vec<_> = lines.iter().map(|l| l.sender.as_str()).collect();
        assert_eq!(senders, vec!["user1", "user2", "user1"]);
        assert_eq!(lines[2].message, "lunch?");
    }

    #[tokio::test]
    async fn test_recent_messages_are_sent_oldest_first() {
        let mut repo = MockMessagingRepository::new();
        repo.expect_find_conversation()
            .returning(|id| Ok(Some(Conversation::new(vec![id.to_string()]))));
        repo.expect_list_messages()
            .withf(|filter, _| {
                filter.conversation_id.as_deref() == Some("c-1") && filter.since.is_some()
            })
            .returning(|_, _| Ok(vec![message("u-ann", "second"), message("u-bob", "first")]));

        let suggester = Arc::new(CapturingSuggester::default());
        let replies = SmartReplies::new(Arc::new(repo), suggester.clone());

        assert_eq!(replies.for_conversation("c-1").await.unwrap(), vec!["ok"]);

        let seen = suggester.seen.lock().unwrap().clone();
        assert_eq!(seen[0].message, "first");
        assert_eq!(seen[0].sender, "user1");
        assert_eq!(seen[1].message, "second");
    }

    #[tokio::test]
    async fn test_unknown_conversation_is_not_found() {
        let mut repo = MockMessagingRepository::new();
        repo.expect_find_conversation().returning(|_| Ok(None));
        repo.expect_list_messages().never();

        let replies = SmartReplies::new(Arc::new(repo), Arc::new(CapturingSuggester::default()));
        let err = replies.for_conversation("missing").await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
