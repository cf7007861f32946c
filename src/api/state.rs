//! Application state shared by all handlers

use std::sync::Arc;

use crate::domain::{
    CheckpointStore, ExchangeRecorder, OperationRegistry, SmartReplies, WorkflowExecutor,
};

#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<WorkflowExecutor>,
    pub registry: Arc<OperationRegistry>,
    /// Same store the executor checkpoints into, when checkpointing is enabled
    pub checkpoints: Option<Arc<dyn CheckpointStore>>,
    /// Records each run's task and answer in the actor's assistant conversation
    pub exchanges: Option<Arc<ExchangeRecorder>>,
    pub smart_replies: Option<Arc<SmartReplies>>,
}

impl AppState {
    pub fn new(executor: Arc<WorkflowExecutor>, registry: Arc<OperationRegistry>) -> Self {
        Self {
            executor,
            registry,
            checkpoints: None,
            exchanges: None,
            smart_replies: None,
        }
    }

    pub fn with_checkpoints(mut self, store: Arc<dyn CheckpointStore>) -> Self {
        self.checkpoints = Some(store);
        self
    }

    pub fn with_exchanges(mut self, recorder: ExchangeRecorder) -> Self {
        self.exchanges = Some(Arc::new(recorder));
        self
    }

    pub fn with_smart_replies(mut self, smart_replies: SmartReplies) -> Self {
        self.smart_replies = Some(Arc::new(smart_replies));
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("executor", &self.executor)
            .field("operations", &self.registry.len())
            .field("checkpoints", &self.checkpoints.is_some())
            .field("exchanges", &self.exchanges.is_some())
            .field("smart_replies", &self.smart_replies.is_some())
            .finish()
    }
}
