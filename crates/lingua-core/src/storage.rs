//! Key-value slot storage interface.
//!
//! Lingua persists exactly two named slots. Both hold a JSON document.

use async_trait::async_trait;

use crate::error::Result;

/// Slot holding the serialized message sequence.
pub const HISTORY_SLOT: &str = "chatHistory";

/// Slot holding the dark-mode preference as a JSON boolean.
pub const DARK_MODE_SLOT: &str = "darkMode";

/// A durable string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a slot. `Ok(None)` when the slot was never written or was removed.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes a slot, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes a slot. Removing a missing slot is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
