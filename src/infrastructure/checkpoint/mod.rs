//! Checkpoint store implementations

mod in_memory;

pub use in_memory::{InMemoryCheckpointConfig, InMemoryCheckpointStore};
