//! Conversation domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A conversation record scoped to one knowledge domain.
///
/// Conversations are created on demand (the first message in a domain with
/// no active conversation, or an explicit "new conversation" action) and
/// deleted explicitly by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation identifier (UUID format).
    pub id: String,
    /// Human-readable conversation title.
    pub title: String,
    /// Tag of the knowledge domain this conversation belongs to.
    pub domain: String,
    /// Timestamp when the conversation was created (RFC 3339 format).
    pub created_at: String,
    /// Timestamp when the conversation was last updated (RFC 3339 format).
    pub updated_at: String,
}

impl Conversation {
    /// Creates a new conversation with a fresh id and current timestamps.
    pub fn new(title: impl Into<String>, domain: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            domain: domain.into(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
