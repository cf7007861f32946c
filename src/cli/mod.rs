//! CLI module for Neuron Agent
//!
//! - `serve`: HTTP API with streaming agent runs
//! - `run`: one-shot run of a single task, printing progress to the terminal

pub mod run;
pub mod serve;

use clap::{Parser, Subcommand};

/// Neuron Agent - plan, execute and answer natural-language tasks
#[derive(Parser)]
#[command(name = "neuron-agent")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Run one task and print the streamed progress
    Run(run::RunArgs),
}
