//! Records agent exchanges as ordinary messages between the actor and the assistant

use std::sync::Arc;

use tracing::debug;

use super::entity::{ChatMessage, Conversation, NewMessage};
use super::repository::MessagingRepository;
use crate::domain::error::DomainError;

/// Stores each task and its final answer in the actor's assistant conversation
#[derive(Debug, Clone)]
pub struct ExchangeRecorder {
    repository: Arc<dyn MessagingRepository>,
    assistant_id: String,
}

impl ExchangeRecorder {
    pub fn new(repository: Arc<dyn MessagingRepository>, assistant_id: impl Into<String>) -> Self {
        Self {
            repository,
            assistant_id: assistant_id.into(),
        }
    }

    pub fn assistant_id(&self) -> &str {
        &self.assistant_id
    }

    /// Store the actor's task in their assistant conversation
    pub async fn record_task(
        &self,
        actor_id: &str,
        task: &str,
    ) -> Result<Conversation, DomainError> {
        let conversation = self.conversation_with(actor_id).await?;

        self.repository
            .create_message(NewMessage {
                conversation_id: conversation.id.clone(),
                sender_id: actor_id.to_string(),
                receiver_id: self.assistant_id.clone(),
                content: task.to_string(),
            })
            .await?;

        debug!(conversation_id = %conversation.id, actor_id = %actor_id, "Recorded task");
        Ok(conversation)
    }

    /// Store the assistant's answer to the actor; blank answers are skipped
    pub async fn record_answer(
        &self,
        actor_id: &str,
        answer: &str,
    ) -> Result<Option<ChatMessage>, DomainError> {
        if answer.trim().is_empty() {
            return Ok(None);
        }

        let conversation = self.conversation_with(actor_id).await?;
        let message = self
            .repository
            .create_message(NewMessage {
                conversation_id: conversation.id,
                sender_id: self.assistant_id.clone(),
                receiver_id: actor_id.to_string(),
                content: answer.to_string(),
            })
            .await?;

        Ok(Some(message))
    }

    async fn conversation_with(&self, actor_id: &str) -> Result<Conversation, DomainError> {
        let participants = vec![self.assistant_id.clone(), actor_id.to_string()];

        match self
            .repository
            .find_conversation_by_participants(&participants)
            .await?
        {
            Some(conversation) => Ok(conversation),
            None => self.repository.create_conversation(participants).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::messaging::repository::MockMessagingRepository;

    const BOT: &str = "bot";

    fn conversation(id: &str) -> Conversation {
        Conversation {
            id: id.to_string(),
            participants: vec![BOT.to_string(), "u-1".to_string()],
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_task_reuses_existing_conversation() {
        let mut repo = MockMessagingRepository::new();
        repo.expect_find_conversation_by_participants()
            .withf(|participants| participants == ["bot".to_string(), "u-1".to_string()])
            .returning(|_| Ok(Some(conversation("c-1"))));
        repo.expect_create_conversation().never();
        repo.expect_create_message()
            .withf(|m| {
                m.conversation_id == "c-1"
                    && m.sender_id == "u-1"
                    && m.receiver_id == BOT
                    && m.content == "how many?"
            })
            .times(1)
            .returning(|m| Ok(m.into_message()));

        let recorder = ExchangeRecorder::new(Arc::new(repo), BOT);
        let conversation = recorder.record_task("u-1", "how many?").await.unwrap();

        assert_eq!(conversation.id, "c-1");
    }

    #[tokio::test]
    async fn test_task_creates_conversation_when_missing() {
        let mut repo = MockMessagingRepository::new();
        repo.expect_find_conversation_by_participants()
            .returning(|_| Ok(None));
        repo.expect_create_conversation()
            .times(1)
            .returning(|_| Ok(conversation("c-new")));
        repo.expect_create_message()
            .withf(|m| m.conversation_id == "c-new")
            .times(1)
            .returning(|m| Ok(m.into_message()));

        let recorder = ExchangeRecorder::new(Arc::new(repo), BOT);
        let conversation = recorder.record_task("u-1", "hi").await.unwrap();

        assert_eq!(conversation.id, "c-new");
    }

    #[tokio::test]
    async fn test_answer_is_sent_by_assistant() {
        let mut repo = MockMessagingRepository::new();
        repo.expect_find_conversation_by_participants()
            .returning(|_| Ok(Some(conversation("c-1"))));
        repo.expect_create_message()
            .withf(|m| {
                m.conversation_id == "c-1"
                    && m.sender_id == BOT
                    && m.receiver_id == "u-1"
                    && m.content == "7"
            })
            .times(1)
            .returning(|m| Ok(m.into_message()));

        let recorder = ExchangeRecorder::new(Arc::new(repo), BOT);
        let message = recorder.record_answer("u-1", "7").await.unwrap();

        assert!(message.is_some());
    }

    #[tokio::test]
    async fn test_blank_answer_is_skipped() {
        let mut repo = MockMessagingRepository::new();
        repo.expect_find_conversation_by_participants().never();
        repo.expect_create_message().never();

        let recorder = ExchangeRecorder::new(Arc::new(repo), BOT);
        assert!(recorder.record_answer("u-1", "  \n").await.unwrap().is_none());
    }
}
