//! LLM provider implementations

mod factory;
mod http_client;
mod openai;

pub use factory::LlmProviderFactory;
pub use http_client::{ByteStream, HttpClient, HttpClientTrait};
pub use openai::{OpenAiProvider, DEFAULT_OLLAMA_BASE_URL, DEFAULT_OPENAI_BASE_URL};
