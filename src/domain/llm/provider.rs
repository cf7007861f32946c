use std::fmt::Debug;
use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use super::completion::{Completion, CompletionEvent, CompletionRequest};
use crate::domain::DomainError;

pub type CompletionStream =
    Pin<Box<dyn Stream<Item = Result<CompletionEvent, DomainError>> + Send>>;

/// A chat-completions backend (OpenAI-compatible endpoint, Ollama, ...)
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, DomainError>;

    /// Stream the completion as text deltas ending in `Finished`
    async fn stream(&self, request: CompletionRequest) -> Result<CompletionStream, DomainError>;

    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use futures::stream;

    use super::*;
    use crate::domain::llm::StopReason;

    /// Scripted provider: replies are consumed in order, the last one repeats
    #[derive(Debug)]
    pub struct MockLlmProvider {
        name: &'static str,
        replies: Mutex<VecDeque<String>>,
        error: Option<String>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl MockLlmProvider {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                replies: Mutex::new(VecDeque::new()),
                error: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn with_reply(self, reply: impl Into<String>) -> Self {
            self.replies.lock().unwrap().push_back(reply.into());
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn reply(&self, request: CompletionRequest) -> Result<String, DomainError> {
            self.requests.lock().unwrap().push(request);

            if let Some(error) = &self.error {
                return Err(DomainError::provider(self.name, error));
            }

            let mut replies = self.replies.lock().unwrap();
            let reply = if replies.len() > 1 {
                replies.pop_front()
            } else {
                replies.front().cloned()
            };
            reply.ok_or_else(|| DomainError::provider(self.name, "No mock reply configured"))
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn complete(&self, request: CompletionRequest) -> Result<Completion, DomainError> {
            let model = request.model.clone();
            let text = self.reply(request)?;

            Ok(Completion {
                stop: Some(StopReason::Complete),
                ..Completion::new(model, text)
            })
        }

        async fn stream(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionStream, DomainError> {
            let text = self.reply(request)?;

            let events: Vec<Result<CompletionEvent, DomainError>> = text
                .split_inclusive(' ')
                .map(|word| Ok(CompletionEvent::Delta(word.to_string())))
                .chain(std::iter::once(Ok(CompletionEvent::Finished(
                    StopReason::Complete,
                ))))
                .collect();

            Ok(Box::pin(stream::iter(events)))
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }
}
