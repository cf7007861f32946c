//! Plan domain: steps produced by the planner and the parser that builds them

mod parser;
mod step;

pub use parser::parse_plan;
pub use step::{PlanDocument, PlanStep};
