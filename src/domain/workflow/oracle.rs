//! Oracle traits consumed by the workflow
//!
//! Oracles are black-box text producers. The workflow only relies on these
//! contracts, so tests can substitute deterministic fakes.

use async_trait::async_trait;

use super::progress::ProgressSink;
use super::solver::SolverRequest;
use super::task::Task;
use crate::domain::DomainError;

/// Produces the raw plan text for a task
#[async_trait]
pub trait PlanningOracle: Send + Sync {
    async fn generate_plan(&self, task: &Task) -> Result<String, DomainError>;
}

/// Turns the final step output into the user-facing answer
#[async_trait]
pub trait SolverOracle: Send + Sync {
    async fn synthesize(
        &self,
        request: &SolverRequest,
        sink: &dyn ProgressSink,
    ) -> Result<String, DomainError>;
}

/// Answers a literal prompt, used by the reserved `LLM` pseudo-operation
#[async_trait]
pub trait LanguageOracle: Send + Sync {
    async fn complete(&self, prompt: &str, sink: &dyn ProgressSink)
        -> Result<String, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use std::sync::Mutex;

    use super::*;

    /// Oracle returning canned text and recording what it was asked
    #[derive(Debug, Default)]
    pub struct ScriptedOracle {
        reply: String,
        error: Option<String>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedOracle {
        pub fn replying(reply: impl Into<String>) -> Self {
            Self {
                reply: reply.into(),
                ..Default::default()
            }
        }

        pub fn failing(message: impl Into<String>) -> Self {
            Self {
                error: Some(message.into()),
                ..Default::default()
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn answer(&self, input: String) -> Result<String, DomainError> {
            self.calls.lock().unwrap().push(input);
            match &self.error {
                Some(message) => Err(DomainError::provider("scripted", message.clone())),
                None => Ok(self.reply.clone()),
            }
        }
    }

    #[async_trait]
    impl PlanningOracle for ScriptedOracle {
        async fn generate_plan(&self, task: &Task) -> Result<String, DomainError> {
            self.answer(task.instruction().to_string())
        }
    }

    #[async_trait]
    impl SolverOracle for ScriptedOracle {
        async fn synthesize(
            &self,
            request: &SolverRequest,
            sink: &dyn ProgressSink,
        ) -> Result<String, DomainError> {
            let answer = self.answer(request.last_result().unwrap_or_default().to_string())?;
            sink.on_token(&answer);
            Ok(answer)
        }
    }

    #[async_trait]
    impl LanguageOracle for ScriptedOracle {
        async fn complete(
            &self,
            prompt: &str,
            sink: &dyn ProgressSink,
        ) -> Result<String, DomainError> {
            let answer = self.answer(prompt.to_string())?;
            sink.on_token(&answer);
            Ok(answer)
        }
    }
}
