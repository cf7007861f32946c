//! Versioned agent API

pub mod agent;
pub mod conversations;
pub mod operations;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/operations", get(operations::list_operations))
        .route("/agent/runs", post(agent::create_run))
        .route("/agent/runs/resume", post(agent::resume_run))
        .route(
            "/conversations/smart-replies",
            post(conversations::smart_replies),
        )
}
