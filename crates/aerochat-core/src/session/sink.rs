//! Session append path for out-of-band message sources.

use crate::conversation::MessageRole;
use async_trait::async_trait;

// Forward declaration - aerochat-application provides the implementation.
// We use dynamic dispatch to avoid a circular dependency between the voice
// adapter and the session service.
/// The single append path used by sources outside the text send flow.
///
/// The voice channel adapter never mutates session state directly; it hands
/// transcripts to this sink, which routes them through the same atomic
/// update primitive as text sends. Failures to persist are absorbed by the
/// implementation (the transcript stays visible either way).
#[async_trait]
pub trait SessionSink: Send + Sync {
    /// Appends a voice-transcribed message to a domain's timeline.
    async fn append_voice_message(&self, domain: &str, role: MessageRole, content: String);
}
