//! Chat use case implementation.
//!
//! This module provides the `ChatUseCase` which wires the `SessionService`
//! and the `VoiceChannelAdapter` together and exposes the single surface the
//! UI layer talks to.

use crate::session::SessionService;
use aerochat_core::answer::AnswerService;
use aerochat_core::conversation::{Conversation, ConversationStore};
use aerochat_core::domain::DomainRegistry;
use aerochat_core::error::Result;
use aerochat_core::session::DomainSession;
use aerochat_core::voice::VoiceTransport;
use aerochat_interaction::config::VoiceProfile;
use aerochat_interaction::voice::VoiceChannelAdapter;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;

/// Use case facade for the chat UI.
///
/// `ChatUseCase` owns the session state machine and the voice channel
/// adapter, hands the service to the adapter as its append sink, and
/// delegates every UI operation to the right component. It holds no state
/// of its own.
pub struct ChatUseCase {
    /// The per-domain session state machine
    session_service: Arc<SessionService>,
    /// Bridge from the real-time voice channel into the session service
    voice_adapter: Arc<VoiceChannelAdapter>,
}

impl ChatUseCase {
    /// Creates a new `ChatUseCase` and wires its components.
    ///
    /// # Arguments
    ///
    /// * `registry` - The fixed set of knowledge domains
    /// * `conversation_store` - Backend for conversation persistence
    /// * `answer_service` - Retrieval-augmented answer backend
    /// * `voice_transport` - Real-time audio transport implementation
    /// * `voice_profiles` - Per-domain voice instructions and knowledge-base
    ///   handles
    pub fn new(
        registry: Arc<DomainRegistry>,
        conversation_store: Arc<dyn ConversationStore>,
        answer_service: Arc<dyn AnswerService>,
        voice_transport: Arc<dyn VoiceTransport>,
        voice_profiles: HashMap<String, VoiceProfile>,
    ) -> Self {
        let session_service = Arc::new(SessionService::new(
            registry,
            conversation_store,
            answer_service,
        ));
        let voice_adapter = Arc::new(VoiceChannelAdapter::new(
            voice_transport,
            session_service.clone(),
            voice_profiles,
        ));
        Self {
            session_service,
            voice_adapter,
        }
    }

    /// Returns snapshots of every domain's session.
    pub async fn sessions(&self) -> HashMap<String, DomainSession> {
        self.session_service.sessions().await
    }

    /// Returns a snapshot of one domain's session.
    pub async fn session(&self, domain: &str) -> DomainSession {
        self.session_service.session(domain).await
    }

    /// Returns the tag of the currently active domain.
    pub async fn active_domain(&self) -> String {
        self.session_service.active_domain().await
    }

    /// Changes the globally active domain.
    pub async fn switch_domain(&self, domain: &str) -> Result<()> {
        self.session_service.switch_domain(domain).await
    }

    /// Creates a new conversation in a domain.
    pub async fn create_conversation(&self, title: &str, domain: &str) -> Option<Conversation> {
        self.session_service.create_conversation(title, domain).await
    }

    /// Sends a user message in a domain.
    pub async fn send_message(
        &self,
        content: &str,
        domain: &str,
        conversation_id: Option<&str>,
    ) -> Result<()> {
        self.session_service
            .send_message(content, domain, conversation_id)
            .await
    }

    /// Switches a domain's current conversation.
    pub async fn switch_conversation(&self, conversation_id: &str, domain: &str) {
        self.session_service
            .switch_conversation(conversation_id, domain)
            .await
    }

    /// Deletes a conversation.
    pub async fn delete_conversation(&self, conversation_id: &str, domain: &str) -> Result<()> {
        self.session_service
            .delete_conversation(conversation_id, domain)
            .await
    }

    /// Connects the voice channel for a domain.
    pub async fn connect_voice(&self, domain: &str) -> Result<()> {
        self.voice_adapter.connect(domain).await
    }

    /// Disconnects the voice channel.
    pub async fn disconnect_voice(&self) {
        self.voice_adapter.disconnect().await
    }

    /// Toggles the outbound microphone track; returns the new muted state.
    pub async fn toggle_mute(&self) -> Result<bool> {
        self.voice_adapter.toggle_mute().await
    }

    /// Returns true while the voice channel is connected.
    pub async fn voice_connected(&self) -> bool {
        self.voice_adapter.is_connected().await
    }

    /// Returns a watch on the assistant's speaking indicator.
    pub fn speaking(&self) -> watch::Receiver<bool> {
        self.voice_adapter.speaking()
    }

    /// Returns the underlying session service.
    pub fn session_service(&self) -> &Arc<SessionService> {
        &self.session_service
    }

    /// Returns the underlying voice adapter.
    pub fn voice_adapter(&self) -> &Arc<VoiceChannelAdapter> {
        &self.voice_adapter
    }
}
