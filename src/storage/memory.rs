//! In-memory key-value backend
//!
//! A HashMap protected by an async RwLock, suitable for tests and
//! single-process use. Production deployments would put the platform's
//! durable local storage behind [`KeyValueStore`](super::KeyValueStore)
//! instead.

use crate::error::StorageError;
use crate::storage::{KeyValueStore, KvConversationStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`KeyValueStore`]
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyValue {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKeyValue {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently stored (for monitoring and tests)
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop all entries (primarily for tests)
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValue {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Conversation store over the in-memory backend
pub type InMemoryConversationStore = KvConversationStore<InMemoryKeyValue>;

impl InMemoryConversationStore {
    /// Convenience constructor for an all-in-memory store
    pub fn in_memory() -> Self {
        KvConversationStore::new(InMemoryKeyValue::new())
    }
}
