//! Neuron Agent
//!
//! Turns a natural-language task into a plan of operation calls, executes the
//! plan step by step and synthesizes a final answer:
//! - LLM-backed planning and answer synthesis (OpenAI-compatible or Ollama)
//! - Messaging operations over a pluggable repository
//! - Checkpointed runs that can be resumed after a failure
//! - Reply suggestions and a record of every exchange with the assistant
//! - HTTP API with server-sent progress events

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use domain::{
    CheckpointStore, ExchangeRecorder, MessagingRepository, OperationRegistry, SmartReplies,
    StepDispatcher, WorkflowExecutor, WorkflowExecutorConfig,
};
use infrastructure::{
    checkpoint::{InMemoryCheckpointConfig, InMemoryCheckpointStore},
    llm::LlmProviderFactory,
    messaging::{InMemoryMessagingRepository, MessagingSeed},
    operations::register_messaging_operations,
    oracle::{LlmLanguageOracle, LlmPlanner, LlmReplySuggester, LlmSolver, ModelBinding},
};
use tracing::info;

/// Create the application state from the default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Wire provider, repository, operations, oracles and executor from configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let provider = LlmProviderFactory::create(&config.llm)?;
    info!(
        provider = provider.provider_name(),
        model = %config.llm.model,
        "LLM provider configured"
    );

    let messaging: Arc<dyn MessagingRepository> = match &config.agent.seed_path {
        Some(path) => {
            let seed = MessagingSeed::load(path).await?;
            info!(
                path = %path,
                users = seed.users.len(),
                messages = seed.messages.len(),
                "Messaging store seeded"
            );
            Arc::new(InMemoryMessagingRepository::with_seed(seed))
        }
        None => Arc::new(InMemoryMessagingRepository::new()),
    };

    let mut registry = OperationRegistry::new();
    register_messaging_operations(
        &mut registry,
        messaging.clone(),
        config.agent.assistant_id.clone(),
    )?;
    let registry = Arc::new(registry);
    info!(operations = registry.len(), "Operation registry built");

    let binding = |model: &str| {
        ModelBinding::new(provider.clone(), model).with_temperature(config.llm.temperature)
    };

    let planner = Arc::new(LlmPlanner::new(binding(&config.llm.model), registry.clone()));
    let solver = Arc::new(LlmSolver::new(binding(config.llm.solver_model())));
    let oracle = Arc::new(LlmLanguageOracle::new(binding(&config.llm.model)));

    let dispatcher = StepDispatcher::new(registry.clone(), oracle);
    let mut executor = WorkflowExecutor::new(planner, dispatcher, solver).with_config(
        WorkflowExecutorConfig {
            solver_input: config.agent.solver_input,
        },
    );

    let checkpoints = config.agent.checkpoints.then(|| -> Arc<dyn CheckpointStore> {
        Arc::new(InMemoryCheckpointStore::with_config(
            InMemoryCheckpointConfig::default()
                .with_ttl(Duration::from_secs(config.agent.checkpoint_ttl_secs))
                .with_max_entries(config.agent.max_checkpoints),
        ))
    });
    if let Some(store) = &checkpoints {
        executor = executor.with_checkpoints(store.clone());
    }

    let smart_replies = SmartReplies::new(
        messaging.clone(),
        Arc::new(LlmReplySuggester::new(binding(&config.llm.model))),
    )
    .with_window(Duration::from_secs(config.agent.smart_reply_window_secs));

    let mut state = AppState::new(Arc::new(executor), registry).with_smart_replies(smart_replies);

    if let Some(store) = checkpoints {
        state = state.with_checkpoints(store);
    }
    if config.agent.record_exchanges {
        state = state.with_exchanges(ExchangeRecorder::new(
            messaging,
            config.agent.assistant_id.clone(),
        ));
    }

    Ok(state)
}
