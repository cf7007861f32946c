//! Language-model oracles for planning, synthesis, `LLM` plan steps and reply suggestions

mod llm;
mod prompts;
mod smart_replies;

pub use llm::{LlmLanguageOracle, LlmPlanner, LlmSolver, ModelBinding};
pub use prompts::{planner_prompt, render_catalog, smart_reply_prompt, solver_prompt};
pub use smart_replies::{LlmReplySuggester, SMART_REPLY_TEMPERATURE};
