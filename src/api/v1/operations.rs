//! Operation catalog endpoint

use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{Json, OperationsResponse};

/// GET /v1/operations - operations a plan may call, in registration order
pub async fn list_operations(State(state): State<AppState>) -> Json<OperationsResponse> {
    Json(OperationsResponse {
        operations: state.registry.catalog(),
    })
}
