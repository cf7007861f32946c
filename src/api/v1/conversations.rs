//! Conversation helpers

use axum::extract::State;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, SmartRepliesRequest, SmartRepliesResponse};

/// POST /v1/conversations/smart-replies
pub async fn smart_replies(
    State(state): State<AppState>,
    Json(request): Json<SmartRepliesRequest>,
) -> Result<Json<SmartRepliesResponse>, ApiError> {
    if request.conversation_id.trim().is_empty() {
        return Err(ApiError::bad_request("conversationId cannot be empty"));
    }

    let Some(smart_replies) = &state.smart_replies else {
        return Err(ApiError::not_found("Smart replies are disabled"));
    };

    let replies = smart_replies
        .for_conversation(&request.conversation_id)
        .await?;
    debug!(conversation_id = %request.conversation_id, count = replies.len(), "Suggested replies");

    Ok(Json(SmartRepliesResponse { replies }))
}
