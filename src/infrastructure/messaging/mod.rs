//! Messaging store implementations

mod in_memory;
mod seed;

pub use in_memory::InMemoryMessagingRepository;
pub use seed::MessagingSeed;
