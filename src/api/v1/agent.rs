//! Agent run endpoints
//!
//! Runs either answer with a single JSON body or, when `stream` is set,
//! with server-sent events:
//!
//! - `plan`: the parsed steps, once planning succeeds
//! - `step`: one per executed step
//! - `token`: streamed answer text
//! - `answer`: the final answer, followed by a `[DONE]` data frame
//! - `error`: the failure body, followed by an `[ERROR]` data frame

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
};
use futures::stream::{self, Stream, StreamExt};
use serde::Serialize;
use serde_json::json;
use tokio::sync::oneshot;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, ResumeRequest, RunRequest, RunResponse};
use crate::domain::{
    ChannelSink, ExchangeRecorder, ProgressEvent, ProgressSink, Task, WorkflowError,
    WorkflowState,
};

type RunOutcome = Result<RunResponse, ApiError>;

/// POST /v1/agent/runs
pub async fn create_run(
    State(state): State<AppState>,
    Json(request): Json<RunRequest>,
) -> Result<Response, ApiError> {
    request.validate().map_err(ApiError::bad_request)?;

    let thread_id = request
        .thread_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    info!(
        thread_id = %thread_id,
        actor_id = %request.actor_id,
        stream = request.stream,
        "Agent run requested"
    );

    if let Some(exchanges) = &state.exchanges {
        exchanges
            .record_task(&request.actor_id, &request.task)
            .await?;
    }

    let task = Task::new(request.task, request.actor_id);
    let executor = state.executor.clone();
    let exchanges = state.exchanges.clone();

    if !request.stream {
        let result = executor.run(&thread_id, task).await;
        record_answer(exchanges.as_deref(), &result).await;
        return Ok(Json(RunResponse::from_state(thread_id, result?)).into_response());
    }

    let (sink, progress) = ChannelSink::channel();
    let sink: Arc<dyn ProgressSink> = Arc::new(sink);
    let (tx, rx) = oneshot::channel();

    let run_thread = thread_id.clone();
    tokio::spawn(async move {
        let result = executor.run(&run_thread, task.with_sink(sink)).await;
        record_answer(exchanges.as_deref(), &result).await;
        let _ = tx.send(into_outcome(&run_thread, result));
    });

    Ok(sse_response(thread_id, progress, rx))
}

/// POST /v1/agent/runs/resume
pub async fn resume_run(
    State(state): State<AppState>,
    Json(request): Json<ResumeRequest>,
) -> Result<Response, ApiError> {
    if request.thread_id.trim().is_empty() {
        return Err(ApiError::bad_request("threadId cannot be empty"));
    }

    if state.checkpoints.is_none() {
        return Err(ApiError::not_found("Checkpointing is disabled"));
    }

    let thread_id = request.thread_id;
    let executor = state.executor.clone();
    let exchanges = state.exchanges.clone();

    let claimed = executor.claim(&thread_id).await?.ok_or_else(|| {
        ApiError::not_found(format!("No checkpoint for thread '{}'", thread_id))
    })?;

    info!(thread_id = %thread_id, stream = request.stream, "Agent resume requested");

    if !request.stream {
        let result = executor.resume_claimed(&thread_id, claimed, None).await;
        record_answer(exchanges.as_deref(), &result).await;
        return Ok(Json(RunResponse::from_state(thread_id, result?)).into_response());
    }

    let (sink, progress) = ChannelSink::channel();
    let sink: Arc<dyn ProgressSink> = Arc::new(sink);
    let (tx, rx) = oneshot::channel();

    let run_thread = thread_id.clone();
    tokio::spawn(async move {
        let result = executor
            .resume_claimed(&run_thread, claimed, Some(sink))
            .await;
        record_answer(exchanges.as_deref(), &result).await;
        let _ = tx.send(into_outcome(&run_thread, result));
    });

    Ok(sse_response(thread_id, progress, rx))
}

/// Store a completed run's answer; failures are logged and never fail the run
async fn record_answer(
    exchanges: Option<&ExchangeRecorder>,
    result: &Result<WorkflowState, WorkflowError>,
) {
    let (Some(exchanges), Ok(state)) = (exchanges, result) else {
        return;
    };
    let Some(answer) = state.final_answer.as_deref() else {
        return;
    };

    if let Err(e) = exchanges.record_answer(state.task.actor_id(), answer).await {
        warn!(actor_id = %state.task.actor_id(), error = %e, "Failed to record answer");
    }
}

/// Converts the final state, dropping it so the sink it owns closes the progress channel
fn into_outcome<E>(thread_id: &str, result: Result<WorkflowState, E>) -> RunOutcome
where
    ApiError: From<E>,
{
    result
        .map(|state| RunResponse::from_state(thread_id, state))
        .map_err(ApiError::from)
}

fn sse_response(
    thread_id: String,
    progress: tokio::sync::mpsc::UnboundedReceiver<ProgressEvent>,
    outcome: oneshot::Receiver<RunOutcome>,
) -> Response {
    Sse::new(event_stream(thread_id, progress, outcome))
        .keep_alive(KeepAlive::default())
        .into_response()
}

fn event_stream(
    thread_id: String,
    progress: tokio::sync::mpsc::UnboundedReceiver<ProgressEvent>,
    outcome: oneshot::Receiver<RunOutcome>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    let progress = UnboundedReceiverStream::new(progress).map(|event| Ok(progress_event(event)));

    let finish = stream::once(async move {
        let outcome = outcome
            .await
            .unwrap_or_else(|_| Err(ApiError::internal("Run ended without a result")));
        stream::iter(final_events(&thread_id, outcome).into_iter().map(Ok))
    })
    .flatten();

    progress.chain(finish)
}

fn progress_event(event: ProgressEvent) -> Event {
    match event {
        ProgressEvent::Plan { plan } => json_event("plan", &json!({ "steps": plan.steps() })),
        ProgressEvent::Token { text } => json_event("token", &json!({ "text": text })),
        ProgressEvent::Step { step_id, payload } => {
            debug!(step_id = %step_id, "Streaming step event");
            json_event("step", &payload)
        }
    }
}

fn final_events(thread_id: &str, outcome: RunOutcome) -> Vec<Event> {
    match outcome {
        Ok(response) => vec![
            json_event(
                "answer",
                &json!({ "threadId": thread_id, "answer": response.answer }),
            ),
            Event::default().data("[DONE]"),
        ],
        Err(err) => vec![
            json_event(
                "error",
                &json!({ "threadId": thread_id, "error": err.detail() }),
            ),
            Event::default().data("[ERROR]"),
        ],
    }
}

fn json_event<T: Serialize>(name: &str, data: &T) -> Event {
    Event::default()
        .event(name)
        .json_data(data)
        .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, StepError};

    fn collect(events: Vec<Event>) -> Vec<String> {
        events.into_iter().map(|e| format!("{:?}", e)).collect()
    }

    #[test]
    fn test_final_events_on_success() {
        let response = RunResponse {
            thread_id: "t-1".to_string(),
            answer: "done".to_string(),
            steps: vec![],
            results: Default::default(),
        };

        let events = collect(final_events("t-1", Ok(response)));
        assert_eq!(events.len(), 2);
        assert!(events[0].contains("answer"));
        assert!(events[1].contains("[DONE]"));
    }

    #[test]
    fn test_final_events_on_failure() {
        let err: ApiError = WorkflowError::step(
            1,
            "#E1",
            StepError::operation_execution("SendMessage", DomainError::internal("boom")),
        )
        .into();

        let events = collect(final_events("t-1", Err(err)));
        assert!(events[0].contains("step_failed"));
        assert!(events[1].contains("[ERROR]"));
    }
}
