//! Chat message types.
//!
//! This module contains types for representing messages in a conversation
//! timeline, including roles and the transient client-side flags used by
//! the optimistic-update flow.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the AI assistant.
    Assistant,
}

/// A single message in a conversation timeline.
///
/// `pending` marks a user message that was echoed optimistically and has not
/// yet been confirmed by a completed round trip. `typing` marks the synthetic
/// "assistant is composing" placeholder; such a message only ever lives in
/// the visible timeline and is never persisted. `voice` marks messages that
/// arrived through the voice channel as transcripts.
///
/// All three flags are omitted from serialized records when false, so
/// persisted conversations carry only confirmed content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message identifier (UUID format).
    pub id: String,
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub content: String,
    /// Timestamp when the message was created (RFC 3339 format).
    pub created_at: String,
    /// True while the message awaits round-trip confirmation.
    #[serde(default, skip_serializing_if = "is_false")]
    pub pending: bool,
    /// True only for the transient composing placeholder.
    #[serde(default, skip_serializing_if = "is_false")]
    pub typing: bool,
    /// True for messages transcribed from the voice channel.
    #[serde(default, skip_serializing_if = "is_false")]
    pub voice: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ChatMessage {
    fn build(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
            pending: false,
            typing: false,
            voice: false,
        }
    }

    /// Creates an optimistic user message awaiting confirmation.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            pending: true,
            ..Self::build(MessageRole::User, content)
        }
    }

    /// Creates a confirmed assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::build(MessageRole::Assistant, content)
    }

    /// Creates the transient "assistant is composing" placeholder.
    pub fn typing_placeholder() -> Self {
        Self {
            typing: true,
            ..Self::build(MessageRole::Assistant, "")
        }
    }

    /// Creates a confirmed user message transcribed from the voice channel.
    pub fn user_voice(content: impl Into<String>) -> Self {
        Self {
            voice: true,
            ..Self::build(MessageRole::User, content)
        }
    }

    /// Creates a confirmed assistant message transcribed from the voice channel.
    pub fn assistant_voice(content: impl Into<String>) -> Self {
        Self {
            voice: true,
            ..Self::build(MessageRole::Assistant, content)
        }
    }

    /// Returns a copy with the pending flag cleared, for persistence.
    pub fn confirmed(&self) -> Self {
        Self {
            pending: false,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_is_pending() {
        let message = ChatMessage::user("what is MEL?");

        assert_eq!(message.role, MessageRole::User);
        assert!(message.pending);
        assert!(!message.typing);
        assert!(!message.voice);
        assert!(!message.id.is_empty());
    }

    #[test]
    fn test_typing_placeholder_is_transient() {
        let placeholder = ChatMessage::typing_placeholder();

        assert_eq!(placeholder.role, MessageRole::Assistant);
        assert!(placeholder.typing);
        assert!(!placeholder.pending);
        assert!(placeholder.content.is_empty());
    }

    #[test]
    fn test_voice_messages_are_confirmed() {
        let user = ChatMessage::user_voice("cleared for takeoff");
        let assistant = ChatMessage::assistant_voice("roger");

        assert!(user.voice && !user.pending);
        assert!(assistant.voice && !assistant.pending);
        assert_eq!(user.role, MessageRole::User);
        assert_eq!(assistant.role, MessageRole::Assistant);
    }

    #[test]
    fn test_serialized_record_omits_false_flags() {
        let message = ChatMessage::assistant("hi there");
        let json = serde_json::to_string(&message).unwrap();

        assert!(!json.contains("pending"));
        assert!(!json.contains("typing"));
        assert!(!json.contains("voice"));
    }

    #[test]
    fn test_confirmed_clears_pending_only() {
        let message = ChatMessage::user("hello");
        let confirmed = message.confirmed();

        assert!(!confirmed.pending);
        assert_eq!(confirmed.id, message.id);
        assert_eq!(confirmed.content, message.content);
    }
}
