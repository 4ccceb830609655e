//! Chat history persisted in the `chatHistory` slot.

use std::sync::Arc;

use async_trait::async_trait;
use lingua_core::error::Result;
use lingua_core::message::{HistoryRepository, Message};
use lingua_core::storage::{HISTORY_SLOT, KeyValueStore};

/// Serializes the whole message sequence as one JSON array.
#[derive(Clone)]
pub struct SlotHistoryRepository {
    store: Arc<dyn KeyValueStore>,
}

impl SlotHistoryRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl HistoryRepository for SlotHistoryRepository {
    async fn load(&self) -> Result<Vec<Message>> {
        match self.store.get(HISTORY_SLOT).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, messages: &[Message]) -> Result<()> {
        let raw = serde_json::to_string(messages)?;
        self.store.set(HISTORY_SLOT, &raw).await
    }

    async fn clear(&self) -> Result<()> {
        self.store.remove(HISTORY_SLOT).await
    }
}
