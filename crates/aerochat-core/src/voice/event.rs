//! Voice channel event and command types.
//!
//! The voice transport carries JSON-encoded events on its control
//! sub-channel. They are decoded exactly once at the adapter boundary into
//! the closed set of variants below; unrecognized payloads decode to
//! `Unknown` rather than failing, so a transport protocol addition never
//! breaks the event pump.

use serde::{Deserialize, Serialize};

/// Inbound events emitted by the voice transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VoiceEvent {
    /// The user's speech was transcribed.
    UserTranscript { transcript: String },
    /// The assistant finished a spoken reply; full transcript attached.
    AssistantTranscript { transcript: String },
    /// The assistant started speaking.
    SpeakingStarted,
    /// The assistant stopped speaking.
    SpeakingStopped,
    /// Any event this client does not understand.
    #[serde(skip)]
    Unknown { kind: String },
}

impl VoiceEvent {
    /// Decodes a raw JSON event payload.
    ///
    /// Payloads whose `type` tag is not recognized (or that are not valid
    /// JSON objects at all) become `Unknown` carrying the observed tag.
    pub fn decode(raw: &str) -> Self {
        match serde_json::from_str::<VoiceEvent>(raw) {
            Ok(event) => event,
            Err(_) => {
                let kind = serde_json::from_str::<serde_json::Value>(raw)
                    .ok()
                    .and_then(|value| {
                        value
                            .get("type")
                            .and_then(|t| t.as_str())
                            .map(str::to_string)
                    })
                    .unwrap_or_else(|| "malformed".to_string());
                VoiceEvent::Unknown { kind }
            }
        }
    }
}

/// Outbound control messages sent to the voice transport.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VoiceCommand {
    /// Configures the remote model for a domain-scoped session.
    ConfigureSession {
        /// Domain-specific system instructions.
        instructions: String,
        /// Handle of the domain-scoped knowledge base.
        knowledge_base: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_user_transcript() {
        let event =
            VoiceEvent::decode(r#"{"type":"user_transcript","transcript":"request pushback"}"#);

        match event {
            VoiceEvent::UserTranscript { transcript } => {
                assert_eq!(transcript, "request pushback");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_decode_speaking_events() {
        assert!(matches!(
            VoiceEvent::decode(r#"{"type":"speaking_started"}"#),
            VoiceEvent::SpeakingStarted
        ));
        assert!(matches!(
            VoiceEvent::decode(r#"{"type":"speaking_stopped"}"#),
            VoiceEvent::SpeakingStopped
        ));
    }

    #[test]
    fn test_unrecognized_tag_becomes_unknown() {
        let event = VoiceEvent::decode(r#"{"type":"rate_limit_notice","seconds":30}"#);

        match event {
            VoiceEvent::Unknown { kind } => assert_eq!(kind, "rate_limit_notice"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_payload_becomes_unknown() {
        let event = VoiceEvent::decode("not json at all");

        match event {
            VoiceEvent::Unknown { kind } => assert_eq!(kind, "malformed"),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
