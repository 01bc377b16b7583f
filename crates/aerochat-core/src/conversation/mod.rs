//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `model`: Conversation record (`Conversation`)
//! - `message`: Timeline message types (`MessageRole`, `ChatMessage`)
//! - `store`: Store trait for conversation persistence

mod message;
mod model;
mod store;

// Re-export public API
pub use message::{ChatMessage, MessageRole};
pub use model::Conversation;
pub use store::ConversationStore;
