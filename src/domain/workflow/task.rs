//! Task submitted to the agent

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::progress::{NoopSink, ProgressSink};

/// A natural-language instruction issued on behalf of an actor
#[derive(Clone, Serialize, Deserialize)]
pub struct Task {
    instruction: String,
    actor_id: String,
    #[serde(skip)]
    sink: Option<Arc<dyn ProgressSink>>,
}

impl Task {
    pub fn new(instruction: impl Into<String>, actor_id: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            actor_id: actor_id.into(),
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Replace the progress sink, e.g. after rehydrating from a checkpoint
    pub fn set_sink(&mut self, sink: Option<Arc<dyn ProgressSink>>) {
        self.sink = sink;
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Identifier scoping which data operations may touch
    pub fn actor_id(&self) -> &str {
        &self.actor_id
    }

    /// The attached sink, or one that discards everything
    pub fn sink(&self) -> &dyn ProgressSink {
        match &self.sink {
            Some(sink) => sink.as_ref(),
            None => &NoopSink,
        }
    }

    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("instruction", &self.instruction)
            .field("actor_id", &self.actor_id)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
