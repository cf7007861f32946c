//! Messaging entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person (or the assistant account) that can exchange messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub last_active: Option<DateTime<Utc>>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            profile_pic: None,
            last_active: None,
            created_at: Utc::now(),
        }
    }
}

/// A thread between a fixed set of participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub participants: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// New conversation with a generated id
    pub fn new(participants: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            participants,
            created_at: Utc::now(),
        }
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }

    /// True when every id in `user_ids` takes part in the conversation
    pub fn has_every(&self, user_ids: &[String]) -> bool {
        user_ids.iter().all(|id| self.has_participant(id))
    }
}

/// A message sent from one user to another inside a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Data needed to create a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub conversation_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
}

impl NewMessage {
    pub fn into_message(self) -> ChatMessage {
        ChatMessage {
            id: Uuid::new_v4().to_string(),
            conversation_id: self.conversation_id,
            sender_id: self.sender_id,
            receiver_id: self.receiver_id,
            content: self.content,
            created_at: Utc::now(),
        }
    }
}

/// Criteria for selecting messages; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
    pub conversation_id: Option<String>,
    pub sender_id: Option<String>,
    pub receiver_id: Option<String>,
    /// Messages sent or received by this user
    pub involving: Option<String>,
    pub exclude_receiver: Option<String>,
    /// Case-insensitive substring of the content
    pub content_contains: Option<String>,
    /// Messages created at or after this instant
    pub since: Option<DateTime<Utc>>,
}

impl MessageFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    pub fn sender(mut self, sender_id: impl Into<String>) -> Self {
        self.sender_id = Some(sender_id.into());
        self
    }

    pub fn receiver(mut self, receiver_id: impl Into<String>) -> Self {
        self.receiver_id = Some(receiver_id.into());
        self
    }

    pub fn involving(mut self, user_id: impl Into<String>) -> Self {
        self.involving = Some(user_id.into());
        self
    }

    pub fn exclude_receiver(mut self, receiver_id: impl Into<String>) -> Self {
        self.exclude_receiver = Some(receiver_id.into());
        self
    }

    pub fn content_contains(mut self, query: impl Into<String>) -> Self {
        self.content_contains = Some(query.into());
        self
    }

    pub fn since(mut self, instant: DateTime<Utc>) -> Self {
        self.since = Some(instant);
        self
    }

    pub fn matches(&self, message: &ChatMessage) -> bool {
        fn eq(expected: &Option<String>, actual: &str) -> bool {
            expected.as_deref().is_none_or(|e| e == actual)
        }

        eq(&self.conversation_id, &message.conversation_id)
            && eq(&self.sender_id, &message.sender_id)
            && eq(&self.receiver_id, &message.receiver_id)
            && self
                .involving
                .as_deref()
                .is_none_or(|u| message.sender_id == u || message.receiver_id == u)
            && self
                .exclude_receiver
                .as_deref()
                .is_none_or(|r| message.receiver_id != r)
            && self.content_contains.as_deref().is_none_or(|q| {
                message.content.to_lowercase().contains(&q.to_lowercase())
            })
            && self.since.is_none_or(|since| message.created_at >= since)
    }
}

/// Offset pagination; `limit` of `None` means no upper bound
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: Option<usize>,
}

impl Page {
    pub fn new(offset: usize, limit: Option<usize>) -> Self {
        Self { offset, limit }
    }

    pub fn all() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(sender: &str, receiver: &str, content: &str) -> ChatMessage {
        NewMessage {
            conversation_id: "c-1".to_string(),
            sender_id: sender.to_string(),
            receiver_id: receiver.to_string(),
            content: content.to_string(),
        }
        .into_message()
    }

    #[test]
    fn test_conversation_participants() {
        let conversation = Conversation::new(vec!["a".to_string(), "b".to_string()]);

        assert!(conversation.has_participant("a"));
        assert!(conversation.has_every(&["b".to_string(), "a".to_string()]));
        assert!(!conversation.has_every(&["a".to_string(), "c".to_string()]));
        assert!(!conversation.id.is_empty());
    }

    #[test]
    fn test_filter_matching() {
        let msg = message("a", "b", "Meeting at Noon");

        assert!(MessageFilter::new().matches(&msg));
        assert!(MessageFilter::new().sender("a").matches(&msg));
        assert!(!MessageFilter::new().sender("b").matches(&msg));
        assert!(MessageFilter::new().involving("b").matches(&msg));
        assert!(!MessageFilter::new().involving("c").matches(&msg));
        assert!(!MessageFilter::new().exclude_receiver("b").matches(&msg));
        assert!(MessageFilter::new().content_contains("meeting").matches(&msg));
        assert!(!MessageFilter::new().content_contains("lunch").matches(&msg));
        assert!(MessageFilter::new().conversation("c-1").matches(&msg));
        assert!(MessageFilter::new()
            .since(msg.created_at - chrono::Duration::minutes(5))
            .matches(&msg));
        assert!(!MessageFilter::new()
            .since(msg.created_at + chrono::Duration::seconds(1))
            .matches(&msg));
    }

    #[test]
    fn test_user_deserializes_from_camel_case() {
        let user: User = serde_json::from_str(
            r#"{"id": "u-1", "email": "ann@example.com", "name": "Ann", "profilePic": "a.png"}"#,
        )
        .unwrap();

        assert_eq!(user.name, "Ann");
        assert_eq!(user.profile_pic.as_deref(), Some("a.png"));
        assert!(user.last_active.is_none());
    }
}
