//! Reply suggestions from the language model

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use super::llm::ModelBinding;
use super::prompts::smart_reply_prompt;
use crate::domain::{ConversationLine, DomainError, ReplySuggester, FALLBACK_REPLIES};

/// Sampling temperature for reply suggestions
pub const SMART_REPLY_TEMPERATURE: f32 = 0.9;

#[derive(Deserialize)]
struct RepliesBody {
    replies: Vec<String>,
}

/// Asks the model for a `{"replies": [...]}` object
#[derive(Debug)]
pub struct LlmReplySuggester {
    binding: ModelBinding,
}

impl LlmReplySuggester {
    pub fn new(binding: ModelBinding) -> Self {
        Self {
            binding: binding.with_temperature(SMART_REPLY_TEMPERATURE),
        }
    }

    async fn try_suggest(
        &self,
        conversation: &[ConversationLine],
    ) -> Result<Vec<String>, DomainError> {
        let conversation_json = serde_json::to_string_pretty(conversation)
            .map_err(|e| DomainError::internal(format!("Failed to encode conversation: {}", e)))?;

        let text = self
            .binding
            .complete(smart_reply_prompt(&conversation_json), "smart_replies")
            .await?;

        parse_replies(&text)
    }
}

#[async_trait]
impl ReplySuggester for LlmReplySuggester {
    async fn suggest(&self, conversation: &[ConversationLine]) -> Vec<String> {
        match self.try_suggest(conversation).await {
            Ok(replies) => replies,
            Err(e) => {
                warn!(error = %e, "Falling back to canned replies");
                FALLBACK_REPLIES.iter().map(|r| r.to_string()).collect()
            }
        }
    }
}

/// Extract the replies object, tolerating code fences or prose around it
fn parse_replies(text: &str) -> Result<Vec<String>, DomainError> {
    let json = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    };

    let body: RepliesBody = serde_json::from_str(json)
        .map_err(|e| DomainError::validation(format!("Unparseable replies: {}", e)))?;

    if body.replies.is_empty() {
        return Err(DomainError::validation("Model returned no replies"));
    }
    Ok(body.replies)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::llm::MockLlmProvider;

    fn lines() -> Vec<ConversationLine> {
        vec![ConversationLine {
            sender: "user1".to_string(),
            message: "lunch today?".to_string(),
        }]
    }

    #[tokio::test]
    async fn test_replies_from_fenced_json() {
        let provider = Arc::new(
            MockLlmProvider::new("mock")
                .with_reply("```json\n{\"replies\": [\"Sure\", \"Can't today\", \"Where?\"]}\n```"),
        );
        let suggester = LlmReplySuggester::new(ModelBinding::new(provider.clone(), "gemma2:2b"));

        let replies = suggester.suggest(&lines()).await;

        assert_eq!(replies, vec!["Sure", "Can't today", "Where?"]);
        let requests = provider.requests();
        assert_eq!(requests[0].temperature, SMART_REPLY_TEMPERATURE);
        assert!(requests[0].user_text().contains("lunch today?"));
    }

    #[tokio::test]
    async fn test_unparseable_output_falls_back() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_reply("sure thing!"));
        let suggester = LlmReplySuggester::new(ModelBinding::new(provider, "m"));

        assert_eq!(suggester.suggest(&lines()).await, FALLBACK_REPLIES.to_vec());
    }

    #[tokio::test]
    async fn test_provider_error_falls_back() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_error("offline"));
        let suggester = LlmReplySuggester::new(ModelBinding::new(provider, "m"));

        assert_eq!(suggester.suggest(&lines()).await, FALLBACK_REPLIES.to_vec());
    }

    #[test]
    fn test_empty_replies_rejected() {
        assert!(parse_replies(r#"{"replies": []}"#).is_err());
        assert_eq!(parse_replies(r#"{"replies": ["a"]}"#).unwrap(), vec!["a"]);
    }
}
