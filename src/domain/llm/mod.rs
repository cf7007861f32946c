//! Language model completion contract used by the oracles

mod completion;
mod provider;

pub use completion::{
    Completion, CompletionEvent, CompletionRequest, PromptMessage, PromptRole, StopReason,
    TokenUsage,
};
pub use provider::{CompletionStream, LlmProvider};

#[cfg(test)]
pub use provider::mock::MockLlmProvider;
