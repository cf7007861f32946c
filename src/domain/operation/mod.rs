//! Operations the agent can invoke from a plan

mod entity;
mod registry;

pub use entity::{params_schema, parse_params, Operation, OperationContext, OperationInfo};
pub use registry::{OperationRegistry, ORACLE_OPERATION};

#[cfg(test)]
pub use entity::mock;
