//! Seed data for the in-memory messaging store

use std::path::Path;

use serde::Deserialize;

use crate::domain::{ChatMessage, Conversation, DomainError, User};

/// Users, conversations and messages loaded at startup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagingSeed {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub conversations: Vec<Conversation>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl MessagingSeed {
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        serde_json::from_str(json)
            .map_err(|e| DomainError::configuration(format!("Invalid messaging seed: {}", e)))
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::configuration(format!(
                "Failed to read messaging seed '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let seed = MessagingSeed::from_json(
            r#"{
                "users": [{"id": "u-1", "email": "ann@example.com", "name": "Ann"}],
                "conversations": [{"id": "c-1", "participants": ["u-1", "u-2"]}],
                "messages": [{
                    "id": "m-1",
                    "conversationId": "c-1",
                    "senderId": "u-1",
                    "receiverId": "u-2",
                    "content": "hello",
                    "createdAt": "2025-03-04T05:59:00Z"
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(seed.users.len(), 1);
        assert_eq!(seed.conversations[0].participants, vec!["u-1", "u-2"]);
        assert_eq!(seed.messages[0].receiver_id, "u-2");
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let seed = MessagingSeed::from_json("{}").unwrap();
        assert!(seed.users.is_empty());
        assert!(seed.messages.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        let result = MessagingSeed::from_json("{not json");
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = MessagingSeed::load("/nonexistent/seed.json").await;
        assert!(result.is_err());
    }
}
