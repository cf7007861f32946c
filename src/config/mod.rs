//! Application configuration

mod app_config;

pub use app_config::{
    AgentConfig, AppConfig, LlmConfig, LlmProviderKind, LogFormat, LoggingConfig, ServerConfig,
};
