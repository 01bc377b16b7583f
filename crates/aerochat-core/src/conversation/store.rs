//! Conversation store trait.
//!
//! Defines the interface for conversation persistence operations.

use super::message::ChatMessage;
use super::model::Conversation;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract store for conversation records and their message timelines.
///
/// This trait defines the contract for persisting and retrieving
/// conversations, decoupling the session logic from the specific storage
/// mechanism (e.g., TOML files, database, remote API).
///
/// Any call may fail with a store error; the session layer treats read
/// failures as non-fatal (logged, falling back to prior or empty state)
/// and surfaces write failures to the caller.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Lists all conversations for a domain, most recently updated first.
    async fn list(&self, domain: &str) -> Result<Vec<Conversation>>;

    /// Creates a new conversation scoped to a domain.
    ///
    /// # Returns
    ///
    /// The created conversation record, including its generated id.
    async fn create(&self, title: &str, domain: &str) -> Result<Conversation>;

    /// Deletes a conversation and its messages.
    ///
    /// Deleting a conversation that does not exist is not an error.
    async fn delete(&self, conversation_id: &str) -> Result<()>;

    /// Returns the ordered message timeline of a conversation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the conversation does not exist.
    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<ChatMessage>>;

    /// Appends a message to a conversation's timeline and bumps its
    /// `updated_at` timestamp.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the conversation does not exist, and
    /// `Validation` if the message is a typing placeholder (placeholders
    /// are never persisted).
    async fn append_message(&self, conversation_id: &str, message: &ChatMessage) -> Result<()>;
}
