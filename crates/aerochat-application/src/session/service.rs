use aerochat_core::answer::AnswerService;
use aerochat_core::conversation::{ChatMessage, Conversation, ConversationStore, MessageRole};
use aerochat_core::domain::DomainRegistry;
use aerochat_core::error::{AerochatError, Result};
use aerochat_core::session::{DomainSession, SessionSink};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::store::SessionStore;

/// The per-domain session state machine.
///
/// `SessionService` is responsible for:
/// - Holding one `DomainSession` per knowledge domain
/// - Providing the sole mutation surface for conversation/message state
/// - Sequencing the two-phase send flow (optimistic echo, typing
///   placeholder, remote call, reconciliation)
/// - Keeping overlapping operations from corrupting the visible timeline
///
/// Every write goes through the session store's atomic update primitive, so
/// a send that resumes after its network round trip reconciles against the
/// live timeline rather than a stale snapshot captured before the await.
pub struct SessionService {
    /// Per-domain session map
    sessions: SessionStore,
    /// Fixed set of knowledge domains
    registry: Arc<DomainRegistry>,
    /// Persistence backend for conversations and messages
    conversation_store: Arc<dyn ConversationStore>,
    /// Retrieval-augmented answer backend
    answer_service: Arc<dyn AnswerService>,
    /// Tag of the domain currently shown in the UI
    active_domain: RwLock<String>,
}

impl SessionService {
    /// Creates a new `SessionService`.
    ///
    /// The initially active domain is the registry's first entry.
    ///
    /// # Arguments
    ///
    /// * `registry` - The fixed set of knowledge domains
    /// * `conversation_store` - Backend for conversation persistence
    /// * `answer_service` - Backend answering user questions
    pub fn new(
        registry: Arc<DomainRegistry>,
        conversation_store: Arc<dyn ConversationStore>,
        answer_service: Arc<dyn AnswerService>,
    ) -> Self {
        let active_domain = registry.first_tag().unwrap_or_default().to_string();
        Self {
            sessions: SessionStore::new(),
            registry,
            conversation_store,
            answer_service,
            active_domain: RwLock::new(active_domain),
        }
    }

    /// Returns the domain registry.
    pub fn registry(&self) -> &Arc<DomainRegistry> {
        &self.registry
    }

    /// Returns a read-only snapshot of a domain's session.
    pub async fn session(&self, domain: &str) -> DomainSession {
        self.sessions.snapshot(domain).await
    }

    /// Returns snapshots of every domain's session.
    pub async fn sessions(&self) -> std::collections::HashMap<String, DomainSession> {
        self.sessions.snapshot_all().await
    }

    /// Returns the tag of the currently active domain.
    pub async fn active_domain(&self) -> String {
        self.active_domain.read().await.clone()
    }

    /// Changes the globally active domain.
    ///
    /// If the target domain's conversation list has never been populated,
    /// this triggers a list load as a side effect. No other domain's state
    /// is touched.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the tag names no registered domain.
    pub async fn switch_domain(&self, domain: &str) -> Result<()> {
        self.ensure_known_domain(domain)?;

        tracing::info!("[SessionService] Switching active domain to {}", domain);
        *self.active_domain.write().await = domain.to_string();

        if self.sessions.snapshot(domain).await.conversations.is_empty() {
            self.load_conversations(domain).await;
        }

        Ok(())
    }

    /// Replaces a domain's conversation list from the store.
    ///
    /// Failure is absorbed: it is logged and the prior list is left
    /// untouched, since stale-or-empty is an acceptable degraded state for
    /// a refresh.
    pub async fn load_conversations(&self, domain: &str) {
        match self.conversation_store.list(domain).await {
            Ok(conversations) => {
                self.sessions
                    .update(domain, move |session| {
                        session.conversations = conversations;
                    })
                    .await;
            }
            Err(e) => {
                tracing::warn!(
                    "[SessionService] Failed to load conversations for {}: {}",
                    domain,
                    e
                );
            }
        }
    }

    /// Replaces a domain's message timeline from the store.
    ///
    /// On failure the timeline is set to empty and `is_loading` cleared
    /// (fail-safe empty state rather than stale or partial data). Either
    /// way the result is only applied while the conversation is still the
    /// current one, so a slow load cannot overwrite a newer conversation's
    /// timeline.
    pub async fn load_messages(&self, conversation_id: &str, domain: &str) {
        let loaded = self.conversation_store.list_messages(conversation_id).await;

        let target = conversation_id.to_string();
        match loaded {
            Ok(messages) => {
                self.sessions
                    .update(domain, move |session| {
                        if session.current_conversation_id.as_deref() == Some(target.as_str()) {
                            session.messages = messages;
                            session.is_loading = false;
                        }
                    })
                    .await;
            }
            Err(e) => {
                tracing::warn!(
                    "[SessionService] Failed to load messages for conversation {}: {}",
                    conversation_id,
                    e
                );
                self.sessions
                    .update(domain, move |session| {
                        if session.current_conversation_id.as_deref() == Some(target.as_str()) {
                            session.messages = Vec::new();
                            session.is_loading = false;
                        }
                    })
                    .await;
            }
        }
    }

    /// Creates a new conversation scoped to a domain and refreshes the
    /// conversation list.
    ///
    /// # Returns
    ///
    /// `Some(conversation)` on success, `None` on failure (logged, never an
    /// error to the caller).
    pub async fn create_conversation(&self, title: &str, domain: &str) -> Option<Conversation> {
        if !self.registry.contains(domain) {
            tracing::warn!(
                "[SessionService] Refusing to create conversation in unknown domain {}",
                domain
            );
            return None;
        }

        match self.conversation_store.create(title, domain).await {
            Ok(conversation) => {
                tracing::info!(
                    "[SessionService] Created conversation {} in {}",
                    conversation.id,
                    domain
                );
                self.load_conversations(domain).await;
                Some(conversation)
            }
            Err(e) => {
                tracing::warn!(
                    "[SessionService] Failed to create conversation in {}: {}",
                    domain,
                    e
                );
                None
            }
        }
    }

    /// Switches a domain's current conversation and loads its timeline.
    ///
    /// The existing messages are intentionally left in place until the load
    /// completes, so the UI never flashes to an empty timeline. Load
    /// failures are swallowed; the session keeps its last-known-good shape.
    pub async fn switch_conversation(&self, conversation_id: &str, domain: &str) {
        if !self.registry.contains(domain) {
            tracing::warn!(
                "[SessionService] Ignoring conversation switch in unknown domain {}",
                domain
            );
            return;
        }

        let target = conversation_id.to_string();
        self.sessions
            .update(domain, move |session| {
                session.current_conversation_id = Some(target);
                session.is_loading = true;
            })
            .await;

        self.load_messages(conversation_id, domain).await;
    }

    /// Sends a user message in a domain and reconciles the answer.
    ///
    /// The flow:
    /// 1. Resolve the target conversation (explicit id, else the domain's
    ///    current conversation, else create one with a generated title).
    /// 2. Atomically append the optimistic user message and a typing
    ///    placeholder to the live timeline.
    /// 3. Call the answer service.
    /// 4. Reconcile against the live timeline: drop the placeholder,
    ///    confirm pending messages, and append the answer. A response whose
    ///    target conversation is no longer current is persisted to the
    ///    store but not injected into the visible timeline.
    ///
    /// # Arguments
    ///
    /// * `content` - The question text
    /// * `domain` - Tag of the domain to send in
    /// * `conversation_id` - Explicit target conversation, if the caller
    ///   pinned one
    ///
    /// # Errors
    ///
    /// Returns `Validation` for empty content or an unknown domain,
    /// `Store` when no target conversation could be created, and
    /// `RemoteAnswer` when the answer service fails. On failure the user's
    /// message stays visible and confirmed; no typing placeholder remains.
    pub async fn send_message(
        &self,
        content: &str,
        domain: &str,
        conversation_id: Option<&str>,
    ) -> Result<()> {
        // 1. Validate input
        if content.trim().is_empty() {
            return Err(AerochatError::validation("message content is empty"));
        }
        self.ensure_known_domain(domain)?;

        // 2. Resolve target conversation
        let target_id = match conversation_id {
            Some(id) => id.to_string(),
            None => {
                let current = self.sessions.snapshot(domain).await.current_conversation_id;
                match current {
                    Some(id) => id,
                    None => {
                        let title = self.generate_title(domain);
                        let conversation = self
                            .create_conversation(&title, domain)
                            .await
                            .ok_or_else(|| {
                                AerochatError::store(
                                    "could not create a conversation for the outgoing message",
                                )
                            })?;
                        let id = conversation.id.clone();
                        let current = id.clone();
                        self.sessions
                            .update(domain, move |session| {
                                session.current_conversation_id = Some(current);
                            })
                            .await;
                        id
                    }
                }
            }
        };

        // 3. Optimistic echo plus typing placeholder, in one atomic patch
        let user_message = ChatMessage::user(content);
        let placeholder = ChatMessage::typing_placeholder();
        let placeholder_id = placeholder.id.clone();
        {
            let user_message = user_message.clone();
            let placeholder = placeholder.clone();
            self.sessions
                .update(domain, move |session| {
                    // a stale placeholder from an overlapping send must not
                    // survive; at most one typing message per timeline
                    session.messages.retain(|m| !m.typing);
                    session.messages.push(user_message);
                    session.messages.push(placeholder);
                    session.is_loading = true;
                })
                .await;
        }

        // 4. Persist the user message (best effort; the echo stays visible)
        if let Err(e) = self
            .conversation_store
            .append_message(&target_id, &user_message.confirmed())
            .await
        {
            tracing::warn!(
                "[SessionService] Failed to persist user message to conversation {}: {}",
                target_id,
                e
            );
        }

        // 5. Ask the answer backend
        tracing::debug!(
            "[SessionService] Asking {} backend for conversation {}",
            domain,
            target_id
        );
        let outcome = self.answer_service.ask(domain, content).await;

        match outcome {
            Ok(answer) => {
                // 6. Reconcile into the live timeline
                let assistant = ChatMessage::assistant(answer);
                let inject = assistant.clone();
                let target = target_id.clone();
                self.sessions
                    .update(domain, move |session| {
                        session.messages.retain(|m| m.id != placeholder_id);
                        for message in &mut session.messages {
                            message.pending = false;
                        }
                        // a response for a conversation the user has left is
                        // persisted below but not injected into the timeline
                        if session.current_conversation_id.as_deref() == Some(target.as_str()) {
                            session.messages.push(inject);
                            session.is_loading = false;
                        }
                    })
                    .await;

                if let Err(e) = self
                    .conversation_store
                    .append_message(&target_id, &assistant)
                    .await
                {
                    tracing::warn!(
                        "[SessionService] Failed to persist assistant message to conversation {}: {}",
                        target_id,
                        e
                    );
                }

                // refresh ordering (updated_at changed)
                self.load_conversations(domain).await;
                Ok(())
            }
            Err(e) => {
                // 7. Roll back to a consistent shape: no orphaned
                //    placeholder, the user's message confirmed, not loading
                self.sessions
                    .update(domain, move |session| {
                        session.messages.retain(|m| m.id != placeholder_id);
                        for message in &mut session.messages {
                            message.pending = false;
                        }
                        session.is_loading = false;
                    })
                    .await;

                tracing::warn!(
                    "[SessionService] Send in {} failed for conversation {}: {}",
                    domain,
                    target_id,
                    e
                );
                Err(match e {
                    AerochatError::RemoteAnswer(_) => e,
                    other => AerochatError::remote_answer(other.to_string()),
                })
            }
        }
    }

    /// Deletes a conversation and reconciles the domain's session.
    ///
    /// If the deleted conversation was current, the pointer is cleared and
    /// the visible timeline emptied. Other domains are untouched.
    ///
    /// # Errors
    ///
    /// Returns the store error when the deletion itself fails; session
    /// state is left unchanged in that case.
    pub async fn delete_conversation(&self, conversation_id: &str, domain: &str) -> Result<()> {
        self.ensure_known_domain(domain)?;

        self.conversation_store.delete(conversation_id).await?;
        tracing::info!(
            "[SessionService] Deleted conversation {} from {}",
            conversation_id,
            domain
        );

        let target = conversation_id.to_string();
        self.sessions
            .update(domain, move |session| {
                if session.current_conversation_id.as_deref() == Some(target.as_str()) {
                    session.current_conversation_id = None;
                    session.messages.clear();
                }
            })
            .await;

        self.load_conversations(domain).await;
        Ok(())
    }

    /// Derives a default conversation title from the domain and the
    /// current date.
    pub fn generate_title(&self, domain: &str) -> String {
        let name = self
            .registry
            .get(domain)
            .map(|d| d.display_name.as_str())
            .unwrap_or(domain);
        format!("{} {}", name, chrono::Local::now().format("%Y-%m-%d"))
    }

    fn ensure_known_domain(&self, domain: &str) -> Result<()> {
        if self.registry.contains(domain) {
            Ok(())
        } else {
            Err(AerochatError::validation(format!(
                "unknown domain '{}'",
                domain
            )))
        }
    }
}

#[async_trait]
impl SessionSink for SessionService {
    /// Appends a voice transcript through the same atomic update path used
    /// by text sends, then persists it to the current conversation when one
    /// is active. Persistence failure is absorbed; the transcript stays in
    /// the visible timeline.
    async fn append_voice_message(&self, domain: &str, role: MessageRole, content: String) {
        if !self.registry.contains(domain) {
            tracing::warn!(
                "[SessionService] Dropping voice message for unknown domain {}",
                domain
            );
            return;
        }

        let message = match role {
            MessageRole::User => ChatMessage::user_voice(content),
            MessageRole::Assistant => ChatMessage::assistant_voice(content),
        };
        let persisted = message.clone();

        self.sessions
            .update(domain, move |session| {
                session.messages.push(message);
            })
            .await;

        let current = self.sessions.snapshot(domain).await.current_conversation_id;
        if let Some(conversation_id) = current {
            if let Err(e) = self
                .conversation_store
                .append_message(&conversation_id, &persisted)
                .await
            {
                tracing::warn!(
                    "[SessionService] Failed to persist voice message to conversation {}: {}",
                    conversation_id,
                    e
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "service_test.rs"]
mod tests;
