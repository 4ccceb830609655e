//! Chat history repository trait.

use async_trait::async_trait;

use super::model::Message;
use crate::error::Result;

/// Persistence for the full, ordered message sequence.
///
/// The history is always written whole; there is no per-message storage.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Loads the persisted sequence.
    ///
    /// # Returns
    ///
    /// - `Ok(messages)`: the stored history, empty if nothing was stored
    /// - `Err(_)`: the slot could not be read or parsed
    async fn load(&self) -> Result<Vec<Message>>;

    /// Replaces the persisted sequence with `messages`.
    async fn save(&self, messages: &[Message]) -> Result<()>;

    /// Removes the persisted history entirely.
    async fn clear(&self) -> Result<()>;
}
