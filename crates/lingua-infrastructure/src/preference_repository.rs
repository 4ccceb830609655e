use std::sync::Arc;

use async_trait::async_trait;
use lingua_core::error::Result;
use lingua_core::preference::PreferenceRepository;
use lingua_core::storage::{DARK_MODE_SLOT, KeyValueStore};

/// Preferences stored as individual JSON slots.
#[derive(Clone)]
pub struct SlotPreferenceRepository {
    store: Arc<dyn KeyValueStore>,
}

impl SlotPreferenceRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PreferenceRepository for SlotPreferenceRepository {
    async fn dark_mode(&self) -> Result<bool> {
        let Some(raw) = self.store.get(DARK_MODE_SLOT).await? else {
            return Ok(false);
        };
        match serde_json::from_str::<bool>(&raw) {
            Ok(enabled) => Ok(enabled),
            Err(e) => {
                tracing::warn!("Ignoring unreadable dark mode preference: {}", e);
                Ok(false)
            }
        }
    }

    async fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        self.store
            .set(DARK_MODE_SLOT, &serde_json::to_string(&enabled)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;

    #[tokio::test]
    async fn test_dark_mode_defaults_to_false() {
        let repository = SlotPreferenceRepository::new(Arc::new(MemoryKeyValueStore::new()));
        assert!(!repository.dark_mode().await.unwrap());
    }

    #[tokio::test]
    async fn test_dark_mode_persists() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let repository = SlotPreferenceRepository::new(store.clone());

        repository.set_dark_mode(true).await.unwrap();
        assert_eq!(store.get(DARK_MODE_SLOT).await.unwrap().as_deref(), Some("true"));
        assert!(repository.dark_mode().await.unwrap());
    }

    #[tokio::test]
    async fn test_garbage_value_reads_as_false() {
        let store = MemoryKeyValueStore::with_slot(DARK_MODE_SLOT, "maybe");
        let repository = SlotPreferenceRepository::new(Arc::new(store));
        assert!(!repository.dark_mode().await.unwrap());
    }
}
