//! Workflow domain module
//!
//! A run moves through `Plan → Tool* → Solve → Done`:
//! - the planning oracle writes a textual plan, parsed into steps
//! - each `Tool` transition dispatches exactly one step, substituting earlier
//!   results for step id tokens (`#E1`, `#E2`, ...) in its parameters
//! - the solver oracle turns the last result into the final answer
//!
//! Progress is counted by an explicit cursor, so repeated step ids only
//! affect variable lookup, never how many steps run.

mod checkpoint;
mod dispatcher;
mod error;
mod executor;
mod oracle;
mod progress;
mod resolver;
mod results;
mod solver;
mod state;
mod task;

pub use checkpoint::CheckpointStore;
pub use dispatcher::StepDispatcher;
pub use error::{ErrorPhase, StepError, WorkflowError};
pub use executor::{WorkflowExecutor, WorkflowExecutorConfig};
pub use oracle::{LanguageOracle, PlanningOracle, SolverOracle};
pub use progress::{ChannelSink, NoopSink, ProgressEvent, ProgressSink};
pub use resolver::resolve;
pub use results::ResultMap;
pub use solver::{SolverInput, SolverRequest};
pub use state::{WorkflowStage, WorkflowState};
pub use task::Task;

#[cfg(test)]
pub use checkpoint::MockCheckpointStore;
#[cfg(test)]
pub use oracle::mock::ScriptedOracle;
#[cfg(test)]
pub use progress::mock::RecordingSink;
