//! Directory-backed ConversationStore implementation.
//!
//! One TOML file per conversation, holding the record metadata and its
//! message timeline. Writes go through a sibling temp file and a rename,
//! so a crash mid-write never leaves a half-written record behind.
//!
//! Directory structure:
//! ```text
//! base_dir/
//! └── conversations/
//!     ├── <conversation-id>.toml
//!     └── ...
//! ```

use aerochat_core::conversation::{ChatMessage, Conversation, ConversationStore};
use aerochat_core::error::{AerochatError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// On-disk record: conversation metadata plus its message timeline.
#[derive(Debug, Serialize, Deserialize)]
struct ConversationRecord {
    conversation: Conversation,
    #[serde(default)]
    messages: Vec<ChatMessage>,
}

/// TOML-file-per-conversation store.
pub struct DirConversationStore {
    conversations_dir: PathBuf,
}

impl DirConversationStore {
    /// Creates a store rooted at `base_dir`, creating the conversations
    /// directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let conversations_dir = base_dir.as_ref().join("conversations");
        fs::create_dir_all(&conversations_dir).await?;
        Ok(Self { conversations_dir })
    }

    /// Creates a store at the default location (`~/.config/aerochat`).
    pub async fn default_location() -> Result<Self> {
        let base_dir = crate::paths::AerochatPaths::config_dir()
            .map_err(|e| AerochatError::io(e.to_string()))?;
        Self::new(base_dir).await
    }

    /// Returns the directory conversation files live in.
    pub fn conversations_dir(&self) -> &Path {
        &self.conversations_dir
    }

    fn record_path(&self, conversation_id: &str) -> Result<PathBuf> {
        // ids are generated UUIDs; refuse anything that could escape the dir
        if conversation_id.is_empty()
            || conversation_id.contains(['/', '\\'])
            || conversation_id.contains("..")
        {
            return Err(AerochatError::validation(format!(
                "invalid conversation id '{}'",
                conversation_id
            )));
        }
        Ok(self
            .conversations_dir
            .join(format!("{}.toml", conversation_id)))
    }

    async fn read_record(&self, conversation_id: &str) -> Result<ConversationRecord> {
        let path = self.record_path(conversation_id)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AerochatError::not_found("Conversation", conversation_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write_record(&self, record: &ConversationRecord) -> Result<()> {
        let path = self.record_path(&record.conversation.id)?;
        let content = toml::to_string_pretty(record)?;
        let tmp = path.with_extension("toml.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl ConversationStore for DirConversationStore {
    async fn list(&self, domain: &str) -> Result<Vec<Conversation>> {
        let mut conversations = Vec::new();
        let mut entries = fs::read_dir(&self.conversations_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }
            let content = match fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(
                        "[DirConversationStore] Skipping unreadable file {}: {}",
                        path.display(),
                        e
                    );
                    continue;
                }
            };
            match toml::from_str::<ConversationRecord>(&content) {
                Ok(record) if record.conversation.domain == domain => {
                    conversations.push(record.conversation);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        "[DirConversationStore] Skipping unparseable record {}: {}",
                        path.display(),
                        e
                    );
                }
            }
        }

        conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(conversations)
    }

    async fn create(&self, title: &str, domain: &str) -> Result<Conversation> {
        let conversation = Conversation::new(title, domain);
        let record = ConversationRecord {
            conversation: conversation.clone(),
            messages: Vec::new(),
        };
        self.write_record(&record).await?;

        tracing::debug!(
            "[DirConversationStore] Created conversation {} in {}",
            conversation.id,
            domain
        );
        Ok(conversation)
    }

    async fn delete(&self, conversation_id: &str) -> Result<()> {
        let path = self.record_path(conversation_id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // already gone counts as deleted
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<ChatMessage>> {
        Ok(self.read_record(conversation_id).await?.messages)
    }

    async fn append_message(&self, conversation_id: &str, message: &ChatMessage) -> Result<()> {
        if message.typing {
            return Err(AerochatError::validation(
                "typing placeholders are never persisted",
            ));
        }

        let mut record = self.read_record(conversation_id).await?;
        record.messages.push(message.clone());
        record.conversation.updated_at = chrono::Utc::now().to_rfc3339();
        self.write_record(&record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerochat_core::conversation::MessageRole;

    async fn store() -> (tempfile::TempDir, DirConversationStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DirConversationStore::new(dir.path()).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_create_and_list_by_domain() {
        let (_dir, store) = store().await;

        store.create("Trip Plan", "a320").await.unwrap();
        store.create("Other fleet", "a350").await.unwrap();

        let listed = store.list("a320").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Trip Plan");
        assert!(store.list("briefing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_bumps_ordering() {
        let (_dir, store) = store().await;

        let first = store.create("First", "a320").await.unwrap();
        let second = store.create("Second", "a320").await.unwrap();

        // second is newest until first receives a message
        let listed = store.list("a320").await.unwrap();
        assert_eq!(listed[0].id, second.id);

        store
            .append_message(&first.id, &ChatMessage::assistant("hello"))
            .await
            .unwrap();

        let listed = store.list("a320").await.unwrap();
        assert_eq!(listed[0].id, first.id);
    }

    #[tokio::test]
    async fn test_message_round_trip() {
        let (_dir, store) = store().await;

        let conversation = store.create("Log", "briefing").await.unwrap();
        assert!(store.list_messages(&conversation.id).await.unwrap().is_empty());

        let user = ChatMessage::user("what is MEL?").confirmed();
        let assistant = ChatMessage::assistant("minimum equipment list");
        store.append_message(&conversation.id, &user).await.unwrap();
        store
            .append_message(&conversation.id, &assistant)
            .await
            .unwrap();

        let messages = store.list_messages(&conversation.id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[1].content, "minimum equipment list");
        assert!(messages.iter().all(|m| !m.pending && !m.typing));
    }

    #[tokio::test]
    async fn test_typing_placeholder_is_refused() {
        let (_dir, store) = store().await;

        let conversation = store.create("Log", "a330").await.unwrap();
        let err = store
            .append_message(&conversation.id, &ChatMessage::typing_placeholder())
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(store.list_messages(&conversation.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (_dir, store) = store().await;

        let conversation = store.create("Gone soon", "a320").await.unwrap();
        store.delete(&conversation.id).await.unwrap();
        store.delete(&conversation.id).await.unwrap();

        assert!(store.list("a320").await.unwrap().is_empty());
        assert!(store
            .list_messages(&conversation.id)
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_path_escaping_ids_are_rejected() {
        let (_dir, store) = store().await;

        let err = store.list_messages("../../etc/passwd").await.unwrap_err();
        assert!(err.is_validation());
    }
}
