//! API request, response and error types

pub mod agent;
pub mod conversations;
pub mod error;
pub mod json;

pub use agent::{OperationsResponse, ResumeRequest, RunRequest, RunResponse};
pub use conversations::{SmartRepliesRequest, SmartRepliesResponse};
pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType};
pub use json::Json;
