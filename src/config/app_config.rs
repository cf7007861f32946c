use serde::Deserialize;

use crate::domain::SolverInput;
use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Kind of chat-completions backend
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderKind {
    #[default]
    Ollama,
    OpenAi,
}

/// Language model used by the planner, the solver and the `LLM` step
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProviderKind,
    /// Overrides the provider's default endpoint
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    /// Model for answer synthesis; falls back to `model`
    #[serde(default)]
    pub solver_model: Option<String>,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl LlmConfig {
    pub fn solver_model(&self) -> &str {
        self.solver_model.as_deref().unwrap_or(&self.model)
    }
}

/// Agent behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Which step result is handed to the solver
    #[serde(default)]
    pub solver_input: SolverInput,
    /// User id of the assistant account; its inbox is hidden from "last sent" queries
    #[serde(default = "default_assistant_id")]
    pub assistant_id: String,
    /// JSON file with users, conversations and messages to preload
    #[serde(default)]
    pub seed_path: Option<String>,
    #[serde(default = "default_true")]
    pub checkpoints: bool,
    /// Seconds a checkpoint of a failed run stays resumable
    #[serde(default = "default_checkpoint_ttl_secs")]
    pub checkpoint_ttl_secs: u64,
    /// Upper bound on stored checkpoints
    #[serde(default = "default_max_checkpoints")]
    pub max_checkpoints: u64,
    /// Store each task and answer in the actor's assistant conversation
    #[serde(default = "default_true")]
    pub record_exchanges: bool,
    /// How far back smart replies look into a conversation
    #[serde(default = "default_smart_reply_window_secs")]
    pub smart_reply_window_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_model() -> String {
    "gemma2:2b".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_assistant_id() -> String {
    "869edb54-d299-4821-bfd6-8a612f26acc3".to_string()
}

fn default_checkpoint_ttl_secs() -> u64 {
    3600
}

fn default_max_checkpoints() -> u64 {
    1_000
}

fn default_smart_reply_window_secs() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderKind::default(),
            base_url: None,
            api_key: None,
            model: default_model(),
            solver_model: None,
            temperature: 0.0,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            solver_input: SolverInput::default(),
            assistant_id: default_assistant_id(),
            seed_path: None,
            checkpoints: true,
            checkpoint_ttl_secs: default_checkpoint_ttl_secs(),
            max_checkpoints: default_max_checkpoints(),
            record_exchanges: true,
            smart_reply_window_secs: default_smart_reply_window_secs(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_json(json: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(json, config::FileFormat::Json))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.llm.provider, LlmProviderKind::Ollama);
        assert_eq!(config.llm.solver_model(), "gemma2:2b");
        assert_eq!(config.agent.solver_input, SolverInput::LastInserted);
        assert!(config.agent.checkpoints);
        assert_eq!(config.agent.checkpoint_ttl_secs, 3600);
        assert_eq!(config.agent.max_checkpoints, 1_000);
        assert!(config.agent.record_exchanges);
        assert_eq!(config.agent.smart_reply_window_secs, 300);
    }

    #[test]
    fn test_empty_source_uses_defaults() {
        let config = from_json("{}");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.timeout_secs, 120);
        assert!(config.observability.metrics.enabled);
    }

    #[test]
    fn test_partial_override() {
        let config = from_json(
            r#"{
                "server": {"port": 9000},
                "llm": {"provider": "openai", "model": "gpt-4o-mini", "solver_model": "gpt-4o"},
                "agent": {"solver_input": "last_plan_step", "checkpoints": false}
            }"#,
        );

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.provider, LlmProviderKind::OpenAi);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.solver_model(), "gpt-4o");
        assert_eq!(config.agent.solver_input, SolverInput::LastPlanStep);
        assert!(!config.agent.checkpoints);
    }
}
