//! Conversation helper request and response types

use serde::{Deserialize, Serialize};

/// Body of `POST /v1/conversations/smart-replies`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartRepliesRequest {
    pub conversation_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartRepliesResponse {
    pub replies: Vec<String>,
}
