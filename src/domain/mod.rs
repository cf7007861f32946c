//! Domain layer - Core business logic and entities

pub mod error;
pub mod llm;
pub mod messaging;
pub mod operation;
pub mod plan;
pub mod workflow;

pub use error::DomainError;
pub use llm::{
    Completion, CompletionEvent, CompletionRequest, CompletionStream, LlmProvider, PromptMessage,
    PromptRole, StopReason, TokenUsage,
};
pub use messaging::{
    ChatMessage, Conversation, ConversationLine, ExchangeRecorder, MessageFilter,
    MessagingRepository, NewMessage, Page, ReplySuggester, SmartReplies, User, FALLBACK_REPLIES,
};
pub use operation::{
    Operation, OperationContext, OperationInfo, OperationRegistry, ORACLE_OPERATION,
};
pub use plan::{parse_plan, PlanDocument, PlanStep};
pub use workflow::{
    ChannelSink, CheckpointStore, ErrorPhase, LanguageOracle, NoopSink, PlanningOracle,
    ProgressEvent, ProgressSink, ResultMap, SolverInput, SolverOracle, SolverRequest, StepDispatcher,
    StepError, Task, WorkflowError, WorkflowExecutor, WorkflowExecutorConfig, WorkflowStage,
    WorkflowState,
};
