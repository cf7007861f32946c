//! Infrastructure layer - External service implementations

pub mod checkpoint;
pub mod llm;
pub mod logging;
pub mod messaging;
pub mod observability;
pub mod operations;
pub mod oracle;
