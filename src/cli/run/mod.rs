//! Run command - executes a single task from the terminal

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use clap::Args;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::domain::{PlanDocument, ProgressSink, Task};
use crate::infrastructure::logging::init_logging;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// User on whose behalf the task runs
    #[arg(long)]
    pub actor: String,

    /// Checkpoint key; a fresh one is generated when omitted
    #[arg(long)]
    pub thread: Option<String>,

    /// Natural-language instruction
    pub task: String,
}

/// Plan, execute and answer one task, streaming progress to stdout
pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = AppConfig::load().unwrap_or_default();
    init_logging(&config.logging);

    let state = crate::create_app_state_with_config(&config).await?;
    let thread_id = args.thread.unwrap_or_else(|| Uuid::new_v4().to_string());

    info!(thread_id = %thread_id, actor_id = %args.actor, "Running task");

    let sink = Arc::new(TerminalSink::new(io::stdout()));
    let task = Task::new(args.task, args.actor).with_sink(sink.clone());

    let result = state.executor.run(&thread_id, task).await;
    sink.finish();

    let result = result?;
    info!(
        thread_id = %thread_id,
        steps = result.cursor,
        "Task finished"
    );

    Ok(())
}

/// Prints plan, step results and answer tokens as they arrive
pub struct TerminalSink<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    fn write(&self, text: &str) {
        if let Ok(mut out) = self.out.lock() {
            // A closed terminal must not fail the run
            let _ = out.write_all(text.as_bytes());
            let _ = out.flush();
        }
    }

    /// Terminate the streamed answer line
    pub fn finish(&self) {
        self.write("\n");
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> ProgressSink for TerminalSink<W> {
    fn on_token(&self, text: &str) {
        self.write(text);
    }

    fn on_step_event(&self, step_id: &str, payload: &Value) {
        let title = payload["title"].as_str().unwrap_or_default();
        let result = match &payload["result"] {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        self.write(&format!("[{}] {} -> {}\n", step_id, title, result));
    }

    fn on_plan(&self, plan: &PlanDocument) {
        let mut text = String::from("Plan:\n");
        for (i, step) in plan.steps().iter().enumerate() {
            text.push_str(&format!(
                "  {}. {} ({} {})\n",
                i + 1,
                step.title(),
                step.step_id(),
                step.operation()
            ));
        }
        text.push('\n');
        self.write(&text);
    }
}
