//! Messaging domain: users, conversations and the messages exchanged in them

mod entity;
mod exchange;
mod replies;
mod repository;

pub use entity::{ChatMessage, Conversation, MessageFilter, NewMessage, Page, User};
pub use exchange::ExchangeRecorder;
pub use replies::{ConversationLine, ReplySuggester, SmartReplies, FALLBACK_REPLIES};
pub use repository::MessagingRepository;

#[cfg(test)]
pub use repository::MockMessagingRepository;
