//! Conversation persistence
//!
//! Two trait seams: [`KeyValueStore`] models the device-local durable
//! key-value collaborator (one entry per conversation plus one entry for the
//! summary list), and [`ConversationStore`] is the interface the engine
//! talks to. The default implementation, [`KvConversationStore`], maps the
//! latter onto the former; [`memory::InMemoryKeyValue`] backs it for tests
//! and single-process use.
//!
//! Single active writer, last-write-wins. No concurrency control beyond the
//! lock inside the key-value backend.

use crate::conversation::{Conversation, ConversationSummary};
use crate::error::StorageError;
use crate::types::ConversationId;
use async_trait::async_trait;
use tracing::debug;

pub mod memory;

/// Scoped string key-value collaborator (the durable local store)
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value for a key, if present
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove a key; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Trait for conversation persistence
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Persist a conversation's message log and refresh its summary entry
    async fn save(&self, conversation: &Conversation) -> Result<(), StorageError>;

    /// Load a conversation by id
    async fn load(&self, id: &ConversationId) -> Result<Option<Conversation>, StorageError>;

    /// Summaries of all stored conversations, most recent first
    async fn list_summaries(&self) -> Result<Vec<ConversationSummary>, StorageError>;

    /// Remove a conversation's message log and its summary entry
    async fn delete(&self, id: &ConversationId) -> Result<(), StorageError>;
}

/// Conversation store backed by a [`KeyValueStore`].
///
/// Key scheme: `<prefix>_<conversation id>` for each message log, plus a
/// single `<prefix>_conversations` entry holding the full summary list.
pub struct KvConversationStore<S: KeyValueStore> {
    kv: S,
    prefix: String,
}

impl<S: KeyValueStore> KvConversationStore<S> {
    /// Wrap a key-value backend with the default `flychat` key prefix
    pub fn new(kv: S) -> Self {
        Self::with_prefix(kv, "flychat")
    }

    /// Wrap a key-value backend with a custom key prefix
    pub fn with_prefix(kv: S, prefix: impl Into<String>) -> Self {
        Self {
            kv,
            prefix: prefix.into(),
        }
    }

    fn conversation_key(&self, id: &ConversationId) -> String {
        format!("{}_{}", self.prefix, id)
    }

    fn summaries_key(&self) -> String {
        format!("{}_conversations", self.prefix)
    }

    async fn read_summaries(&self) -> Result<Vec<ConversationSummary>, StorageError> {
        match self.kv.get(&self.summaries_key()).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| StorageError::Deserialization(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn write_summaries(
        &self,
        summaries: &[ConversationSummary],
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(summaries)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.kv.set(&self.summaries_key(), raw).await
    }
}

#[async_trait]
impl<S: KeyValueStore> ConversationStore for KvConversationStore<S> {
    async fn save(&self, conversation: &Conversation) -> Result<(), StorageError> {
        // The stored summary title follows the first user message; the
        // placeholder survives until one exists.
        let mut entry = conversation.summary();
        if let Some(derived) = conversation.derived_title() {
            entry.title = derived;
        }

        let raw = serde_json::to_string(conversation)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.kv.set(&self.conversation_key(&conversation.id), raw).await?;

        let mut summaries = self.read_summaries().await?;
        match summaries.iter_mut().find(|s| s.id == conversation.id) {
            Some(existing) => *existing = entry,
            None => summaries.push(entry),
        }
        self.write_summaries(&summaries).await?;

        debug!(conversation_id = %conversation.id, messages = conversation.messages.len(), "conversation saved");
        Ok(())
    }

    async fn load(&self, id: &ConversationId) -> Result<Option<Conversation>, StorageError> {
        match self.kv.get(&self.conversation_key(id)).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StorageError::Deserialization(e.to_string())),
            None => Ok(None),
        }
    }

    async fn list_summaries(&self) -> Result<Vec<ConversationSummary>, StorageError> {
        let mut summaries = self.read_summaries().await?;
        summaries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(summaries)
    }

    async fn delete(&self, id: &ConversationId) -> Result<(), StorageError> {
        self.kv.remove(&self.conversation_key(id)).await?;

        let mut summaries = self.read_summaries().await?;
        summaries.retain(|s| &s.id != id);
        self.write_summaries(&summaries).await?;

        debug!(conversation_id = %id, "conversation deleted");
        Ok(())
    }
}
