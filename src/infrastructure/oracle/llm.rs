//! Oracles backed by a chat-completions provider

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::StreamExt;
use tracing::{debug, warn};

use super::prompts::{planner_prompt, solver_prompt};
use crate::domain::{
    CompletionEvent, CompletionRequest, DomainError, LanguageOracle, LlmProvider,
    OperationRegistry, PlanningOracle, ProgressSink, SolverOracle, SolverRequest, Task,
};
use crate::infrastructure::observability::{record_llm_request, LlmRequestMetricParams};

/// Provider, model and sampling temperature used by one oracle
#[derive(Debug, Clone)]
pub struct ModelBinding {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f32,
}

impl ModelBinding {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request(&self, prompt: String) -> CompletionRequest {
        CompletionRequest::prompt(&self.model, prompt).with_temperature(self.temperature)
    }

    pub(super) async fn complete(&self, prompt: String, role: &str) -> Result<String, DomainError> {
        let start = Instant::now();
        let result = self.provider.complete(self.request(prompt)).await;
        self.record(role, start, result.is_ok());

        Ok(result?.text)
    }

    /// Stream the completion, forwarding every delta to `sink`
    async fn stream(
        &self,
        prompt: String,
        role: &str,
        sink: &dyn ProgressSink,
    ) -> Result<String, DomainError> {
        let start = Instant::now();
        let result = self.collect_stream(prompt, sink).await;
        self.record(role, start, result.is_ok());
        result
    }

    async fn collect_stream(
        &self,
        prompt: String,
        sink: &dyn ProgressSink,
    ) -> Result<String, DomainError> {
        let mut stream = self
            .provider
            .stream(self.request(prompt).streaming())
            .await?;

        let mut text = String::new();
        while let Some(event) = stream.next().await {
            match event? {
                CompletionEvent::Delta(delta) if !delta.is_empty() => {
                    sink.on_token(&delta);
                    text.push_str(&delta);
                }
                CompletionEvent::Delta(_) => {}
                CompletionEvent::Finished(reason) => {
                    debug!(model = %self.model, ?reason, "Stream finished");
                }
            }
        }

        Ok(text)
    }

    fn record(&self, role: &str, start: Instant, success: bool) {
        if !success {
            warn!(
                provider = self.provider.provider_name(),
                model = %self.model,
                role,
                "Language model call failed"
            );
        }

        record_llm_request(LlmRequestMetricParams {
            provider: self.provider.provider_name(),
            model: &self.model,
            role,
            duration: start.elapsed(),
            success,
        });
    }
}

/// Planning oracle that prompts the model with the operation catalog
#[derive(Debug)]
pub struct LlmPlanner {
    binding: ModelBinding,
    registry: Arc<OperationRegistry>,
}

impl LlmPlanner {
    pub fn new(binding: ModelBinding, registry: Arc<OperationRegistry>) -> Self {
        Self { binding, registry }
    }
}

#[async_trait]
impl PlanningOracle for LlmPlanner {
    async fn generate_plan(&self, task: &Task) -> Result<String, DomainError> {
        let prompt = planner_prompt(task.actor_id(), &self.registry.catalog(), task.instruction());
        let plan = self.binding.complete(prompt, "planner").await?;

        debug!(model = %self.binding.model(), plan = %plan, "Received plan");
        Ok(plan)
    }
}

/// Solver oracle that streams the formatted answer
#[derive(Debug)]
pub struct LlmSolver {
    binding: ModelBinding,
}

impl LlmSolver {
    pub fn new(binding: ModelBinding) -> Self {
        Self { binding }
    }
}

#[async_trait]
impl SolverOracle for LlmSolver {
    async fn synthesize(
        &self,
        request: &SolverRequest,
        sink: &dyn ProgressSink,
    ) -> Result<String, DomainError> {
        let prompt = solver_prompt(request.task(), request.last_result());
        self.binding.stream(prompt, "solver", sink).await
    }
}

/// Answers `LLM` plan steps with a plain completion.
///
/// The text is an intermediate result, so nothing is forwarded to the sink.
#[derive(Debug)]
pub struct LlmLanguageOracle {
    binding: ModelBinding,
}

impl LlmLanguageOracle {
    pub fn new(binding: ModelBinding) -> Self {
        Self { binding }
    }
}

#[async_trait]
impl LanguageOracle for LlmLanguageOracle {
    async fn complete(
        &self,
        prompt: &str,
        _sink: &dyn ProgressSink,
    ) -> Result<String, DomainError> {
        self.binding.complete(prompt.to_string(), "oracle").await
    }
}
