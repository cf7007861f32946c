use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

/// One completion call: a model, its prompt and sampling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<PromptMessage>,
    pub temperature: f32,
    #[serde(default)]
    pub stream: bool,
}

impl CompletionRequest {
    /// Single user-turn prompt, which is how every oracle talks to the model
    pub fn prompt(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![PromptMessage {
                role: PromptRole::User,
                content: text.into(),
            }],
            temperature: 0.0,
            stream: false,
        }
    }

    pub fn with_system(mut self, text: impl Into<String>) -> Self {
        self.messages.insert(
            0,
            PromptMessage {
                role: PromptRole::System,
                content: text.into(),
            },
        );
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn streaming(mut self) -> Self {
        self.stream = true;
        self
    }

    /// Text of the final user turn
    pub fn user_text(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == PromptRole::User)
            .map_or("", |m| m.content.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Complete,
    MaxTokens,
    Filtered,
}

impl StopReason {
    /// Map an OpenAI-style `finish_reason`; anything unknown counts as complete
    pub fn from_finish_reason(reason: &str) -> Self {
        match reason {
            "length" => Self::MaxTokens,
            "content_filter" => Self::Filtered,
            _ => Self::Complete,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt: u32,
    pub completion: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.prompt + self.completion
    }
}

/// Full text returned by a non-streaming call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub model: String,
    pub text: String,
    pub stop: Option<StopReason>,
    pub usage: Option<TokenUsage>,
}

impl Completion {
    pub fn new(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            text: text.into(),
            stop: None,
            usage: None,
        }
    }
}

/// Item of a streaming call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionEvent {
    Delta(String),
    Finished(StopReason),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_request() {
        let request = CompletionRequest::prompt("gemma2:2b", "Send hello to Ann")
            .with_system("You are a planner")
            .streaming();

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, PromptRole::System);
        assert_eq!(request.user_text(), "Send hello to Ann");
        assert_eq!(request.temperature, 0.0);
        assert!(request.stream);
    }

    #[test]
    fn test_stop_reason_mapping() {
        assert_eq!(StopReason::from_finish_reason("stop"), StopReason::Complete);
        assert_eq!(StopReason::from_finish_reason("length"), StopReason::MaxTokens);
        assert_eq!(StopReason::from_finish_reason("content_filter"), StopReason::Filtered);
        assert_eq!(StopReason::from_finish_reason("tool_calls"), StopReason::Complete);
    }

    #[test]
    fn test_usage_total() {
        let usage = TokenUsage {
            prompt: 10,
            completion: 20,
        };
        assert_eq!(usage.total(), 30);
    }
}
