//! Progress observation for running workflows
//!
//! Sinks are a side channel: every method is fire-and-forget and a sink that
//! can no longer deliver (for example a dropped SSE client) must swallow the
//! failure instead of returning it to the workflow.

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::domain::plan::PlanDocument;

/// Observer of tokens, completed steps and the parsed plan
pub trait ProgressSink: Send + Sync {
    /// A streamed token from an oracle call
    fn on_token(&self, text: &str);

    /// A step finished; `payload` is the raw event describing it
    fn on_step_event(&self, step_id: &str, payload: &Value);

    /// The plan was parsed and is about to be executed
    fn on_plan(&self, _plan: &PlanDocument) {}
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn on_token(&self, _text: &str) {}

    fn on_step_event(&self, _step_id: &str, _payload: &Value) {}
}

/// Event forwarded by [`ChannelSink`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    Plan { plan: PlanDocument },
    Token { text: String },
    Step { step_id: String, payload: Value },
}

/// Sink that pushes events into an unbounded tokio channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<ProgressEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink together with the receiving end of its channel
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn send(&self, event: ProgressEvent) {
        // Receiver gone means nobody is watching any more
        let _ = self.tx.send(event);
    }
}

impl ProgressSink for ChannelSink {
    fn on_token(&self, text: &str) {
        self.send(ProgressEvent::Token {
            text: text.to_string(),
        });
    }

    fn on_step_event(&self, step_id: &str, payload: &Value) {
        self.send(ProgressEvent::Step {
            step_id: step_id.to_string(),
            payload: payload.clone(),
        });
    }

    fn on_plan(&self, plan: &PlanDocument) {
        self.send(ProgressEvent::Plan { plan: plan.clone() });
    }
}
