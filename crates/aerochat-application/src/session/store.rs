//! In-memory per-domain session map with an atomic update primitive.

use aerochat_core::session::DomainSession;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The shared map of per-domain sessions.
///
/// This is the only shared mutable state in the session layer, and
/// [`SessionStore::update`] is its universal write primitive: every mutation
/// is a closure applied under the write lock against the latest state at
/// application time. Callers must never read a session, await, and then
/// write back what they read; two interleaved writers (an in-flight send's
/// placeholder removal racing with a voice transcript append) would silently
/// drop one of the updates.
#[derive(Clone)]
pub struct SessionStore {
    /// In-memory session map keyed by domain tag
    sessions: Arc<RwLock<HashMap<String, DomainSession>>>,
}

impl SessionStore {
    /// Creates a new empty SessionStore.
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns a cloned snapshot of a domain's session.
    ///
    /// Domains that have never been written yield the default empty session.
    pub async fn snapshot(&self, domain: &str) -> DomainSession {
        let sessions = self.sessions.read().await;
        sessions.get(domain).cloned().unwrap_or_default()
    }

    /// Applies an atomic patch to a domain's session.
    ///
    /// The closure runs under the write lock against the current state, so
    /// concurrent callers are serialized and no update is lost.
    pub async fn update<F>(&self, domain: &str, apply: F)
    where
        F: FnOnce(&mut DomainSession),
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(domain.to_string()).or_default();
        apply(session);
    }

    /// Returns a cloned snapshot of every domain's session.
    pub async fn snapshot_all(&self) -> HashMap<String, DomainSession> {
        self.sessions.read().await.clone()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerochat_core::conversation::ChatMessage;

    #[tokio::test]
    async fn test_snapshot_of_unknown_domain_is_empty() {
        let store = SessionStore::new();

        let session = store.snapshot("a320").await;

        assert!(session.conversations.is_empty());
        assert!(session.messages.is_empty());
        assert!(session.current_conversation_id.is_none());
        assert!(!session.is_loading);
    }

    #[tokio::test]
    async fn test_update_applies_against_latest_state() {
        let store = SessionStore::new();

        store
            .update("a320", |s| s.messages.push(ChatMessage::user("one")))
            .await;
        store
            .update("a320", |s| s.messages.push(ChatMessage::user("two")))
            .await;

        let session = store.snapshot("a320").await;
        assert_eq!(session.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_update_is_domain_scoped() {
        let store = SessionStore::new();

        store.update("a320", |s| s.is_loading = true).await;

        assert!(store.snapshot("a320").await.is_loading);
        assert!(!store.snapshot("a350").await.is_loading);
    }
}
