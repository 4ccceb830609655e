use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use lingua_core::error::Result;
use lingua_core::storage::KeyValueStore;
use tokio::sync::RwLock;

/// Process-local slots. Nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with one slot already written.
    pub fn with_slot(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut slots = HashMap::new();
        slots.insert(key.into(), value.into());
        Self {
            slots: Arc::new(RwLock::new(slots)),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.slots
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.slots.write().await.remove(key);
        Ok(())
    }
}
