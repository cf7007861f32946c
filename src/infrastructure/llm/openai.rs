use async_trait::async_trait;
use bytes::Bytes;
use futures::{future, stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::http_client::HttpClientTrait;
use crate::domain::{
    Completion, CompletionEvent, CompletionRequest, CompletionStream, DomainError, LlmProvider,
    PromptMessage, StopReason, TokenUsage,
};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Chat-completions provider for OpenAI and OpenAI-compatible servers (Ollama)
#[derive(Debug)]
pub struct OpenAiProvider<C: HttpClientTrait> {
    client: C,
    name: &'static str,
    auth_header: Option<String>,
    base_url: String,
}

impl<C: HttpClientTrait> OpenAiProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let api_key = api_key.into();
        let auth_header = (!api_key.is_empty()).then(|| format!("Bearer {}", api_key));

        Self {
            client,
            name: "openai",
            auth_header,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Local Ollama server through its OpenAI-compatible endpoint; no key needed
    pub fn ollama(client: C, base_url: impl Into<String>) -> Self {
        Self {
            name: "ollama",
            ..Self::with_base_url(client, "", base_url)
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];
        if let Some(auth) = &self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }
        headers
    }

    fn body(&self, request: &CompletionRequest, stream: bool) -> Result<Value, DomainError> {
        serde_json::to_value(ChatBody {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            stream,
        })
        .map_err(|e| DomainError::internal(format!("Failed to encode request: {}", e)))
    }

    fn decode(&self, json: Value) -> Result<Completion, DomainError> {
        let reply: ChatReply = serde_json::from_value(json).map_err(|e| {
            DomainError::provider(self.name, format!("Failed to parse response: {}", e))
        })?;

        let choice = reply
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider(self.name, "No choices in response"))?;

        Ok(Completion {
            model: reply.model,
            text: choice.message.content.unwrap_or_default(),
            stop: choice
                .finish_reason
                .as_deref()
                .map(StopReason::from_finish_reason),
            usage: reply.usage.map(|u| TokenUsage {
                prompt: u.prompt_tokens,
                completion: u.completion_tokens,
            }),
        })
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OpenAiProvider<C> {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, DomainError> {
        let body = self.body(&request, false)?;
        let json = self
            .client
            .post_json(&self.endpoint(), self.headers(), &body)
            .await?;

        self.decode(json)
    }

    async fn stream(&self, request: CompletionRequest) -> Result<CompletionStream, DomainError> {
        let body = self.body(&request, true)?;
        let bytes = self
            .client
            .post_json_stream(&self.endpoint(), self.headers(), &body)
            .await?;

        let events = bytes
            .scan(SseLineBuffer::default(), |buffer, result: Result<Bytes, DomainError>| {
                let items: Vec<Result<CompletionEvent, DomainError>> = match result {
                    Ok(bytes) => buffer
                        .push(&bytes)
                        .iter()
                        .flat_map(|data| decode_sse_data(data))
                        .map(Ok)
                        .collect(),
                    Err(e) => vec![Err(e)],
                };
                future::ready(Some(stream::iter(items)))
            })
            .flatten();

        Ok(Box::pin(events))
    }

    fn provider_name(&self) -> &'static str {
        self.name
    }
}

/// Reassembles `data:` lines that may be split across network chunks
#[derive(Debug, Default)]
struct SseLineBuffer {
    pending: String,
}

impl SseLineBuffer {
    /// Append raw bytes and return the payloads of every completed `data:` line
    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.push_str(&String::from_utf8_lossy(bytes));

        let mut payloads = Vec::new();
        while let Some(end) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=end).collect();
            if let Some(data) = line.trim_end().strip_prefix("data:") {
                payloads.push(data.trim_start().to_string());
            }
        }
        payloads
    }
}

/// Events carried by one `data:` payload; malformed payloads are skipped
fn decode_sse_data(data: &str) -> Vec<CompletionEvent> {
    if data.trim() == "[DONE]" {
        return vec![CompletionEvent::Finished(StopReason::Complete)];
    }

    let Ok(chunk) = serde_json::from_str::<ChatChunk>(data) else {
        return Vec::new();
    };
    let Some(choice) = chunk.choices.into_iter().next() else {
        return Vec::new();
    };

    let mut events = Vec::new();
    if let Some(text) = choice.delta.content {
        events.push(CompletionEvent::Delta(text));
    }
    // The closing [DONE] reports completion, so only abnormal stops are surfaced here
    if let Some(reason) = choice.finish_reason.as_deref().map(StopReason::from_finish_reason) {
        if reason != StopReason::Complete {
            events.push(CompletionEvent::Finished(reason));
        }
    }
    events
}

#[derive(Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatReply {
    model: String,
    choices: Vec<ReplyChoice>,
    usage: Option<ReplyUsage>,
}

#[derive(Deserialize)]
struct ReplyChoice {
    message: ReplyMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ReplyUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Deserialize)]
struct ChatChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}
