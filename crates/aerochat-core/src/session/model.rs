//! Per-domain session state.

use crate::conversation::{ChatMessage, Conversation};
use serde::{Deserialize, Serialize};

/// The per-domain aggregate of conversation and timeline state.
///
/// One instance exists per knowledge domain, all held in a map keyed by
/// domain tag. `messages` always reflects the timeline of
/// `current_conversation_id`, except for the brief window between switching
/// conversations and the reconciling load completing.
///
/// Sessions are mutated exclusively through the session store's atomic
/// update primitive; no other code path may write these fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainSession {
    /// Conversations known for this domain, most recently updated first.
    pub conversations: Vec<Conversation>,
    /// The currently selected conversation, if any.
    pub current_conversation_id: Option<String>,
    /// The visible message timeline of the current conversation.
    pub messages: Vec<ChatMessage>,
    /// True while a load or send for this domain is in flight.
    pub is_loading: bool,
}

impl DomainSession {
    /// Returns true if any message in the timeline is a typing placeholder.
    pub fn has_typing_placeholder(&self) -> bool {
        self.messages.iter().any(|m| m.typing)
    }
}
