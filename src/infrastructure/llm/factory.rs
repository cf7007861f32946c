use std::sync::Arc;
use std::time::Duration;

use super::http_client::HttpClient;
use super::openai::{OpenAiProvider, DEFAULT_OLLAMA_BASE_URL, DEFAULT_OPENAI_BASE_URL};
use crate::config::{LlmConfig, LlmProviderKind};
use crate::domain::{DomainError, LlmProvider};

/// Factory for creating LLM providers from configuration
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    pub fn create(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let http_client = HttpClient::with_timeout(Duration::from_secs(config.timeout_secs))?;

        match config.provider {
            LlmProviderKind::OpenAi => {
                let api_key = config
                    .api_key
                    .as_deref()
                    .filter(|key| !key.is_empty())
                    .ok_or_else(|| {
                        DomainError::configuration("llm.api_key is required for the openai provider")
                    })?;
                let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_OPENAI_BASE_URL);

                Ok(Arc::new(OpenAiProvider::with_base_url(
                    http_client,
                    api_key,
                    base_url,
                )))
            }
            LlmProviderKind::Ollama => {
                let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_OLLAMA_BASE_URL);
                Ok(Arc::new(OpenAiProvider::ollama(http_client, base_url)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::domain::CompletionRequest;

    #[test]
    fn test_openai_requires_api_key() {
        let config = LlmConfig {
            provider: LlmProviderKind::OpenAi,
            ..LlmConfig::default()
        };

        let err = LlmProviderFactory::create(&config).unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
    }

    #[test]
    fn test_provider_names() {
        let ollama = LlmProviderFactory::create(&LlmConfig::default()).unwrap();
        assert_eq!(ollama.provider_name(), "ollama");

        let openai = LlmProviderFactory::create(&LlmConfig {
            provider: LlmProviderKind::OpenAi,
            api_key: Some("sk-test".to_string()),
            ..LlmConfig::default()
        })
        .unwrap();
        assert_eq!(openai.provider_name(), "openai");
    }

    #[tokio::test]
    async fn test_configured_base_url_is_used() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "model": "gemma2:2b",
                "choices": [{
                    "message": {"role": "assistant", "content": "pong"},
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = LlmProviderFactory::create(&LlmConfig {
            base_url: Some(server.uri()),
            ..LlmConfig::default()
        })
        .unwrap();

        let completion = provider
            .complete(CompletionRequest::prompt("gemma2:2b", "ping"))
            .await
            .unwrap();
        assert_eq!(completion.text, "pong");
    }
}
