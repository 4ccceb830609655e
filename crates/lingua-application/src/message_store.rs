//! The ordered message log.
//!
//! `MessageStore` is the single owner of the message sequence. Every mutation
//! is a pure transform of the previous sequence applied under one write lock,
//! then the full sequence is persisted. Readers only ever observe complete
//! sequences.

use std::sync::Arc;

use lingua_core::error::Result;
use lingua_core::message::{
    HistoryRepository, Message, MessageId, MessageIdGenerator, MessagePatch, Translation,
};
use tokio::sync::RwLock;

pub struct MessageStore {
    messages: RwLock<Vec<Message>>,
    repository: Arc<dyn HistoryRepository>,
    ids: MessageIdGenerator,
}

impl MessageStore {
    /// Opens the store, reloading the persisted history.
    ///
    /// An unreadable history is logged and replaced by an empty one; it is
    /// overwritten on the next mutation. Work interrupted by the previous
    /// session is settled: placeholders go and in-flight flags are reset.
    pub async fn open(repository: Arc<dyn HistoryRepository>) -> Self {
        let messages = match repository.load().await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!("Discarding unreadable chat history: {}", e);
                Vec::new()
            }
        };
        let messages = settle_interrupted(messages);

        let floor = messages.iter().map(|m| m.id).max().unwrap_or(0);
        tracing::debug!(
            "[MessageStore] Loaded {} messages (max id {})",
            messages.len(),
            floor
        );

        Self {
            messages: RwLock::new(messages),
            repository,
            ids: MessageIdGenerator::starting_after(floor),
        }
    }

    /// Allocates a fresh id, greater than every id handed out before.
    pub fn next_id(&self) -> MessageId {
        self.ids.next_id()
    }

    pub async fn snapshot(&self) -> Vec<Message> {
        self.messages.read().await.clone()
    }

    pub async fn find(&self, id: MessageId) -> Option<Message> {
        self.messages
            .read()
            .await
            .iter()
            .find(|m| m.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }

    /// Applies `f` to the current sequence and stores its result.
    ///
    /// This is the primitive every other mutation is built on. The write lock
    /// is held across persistence so the slot sees writes in the same order
    /// as readers do.
    pub async fn transform<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(Vec<Message>) -> (Vec<Message>, R),
    {
        let mut guard = self.messages.write().await;
        let current = guard.clone();
        let (next, output) = f(current);
        *guard = next;

        if let Err(e) = self.repository.save(&guard).await {
            tracing::error!("[MessageStore] Failed to persist chat history: {}", e);
            return Err(e);
        }

        Ok(output)
    }

    pub async fn append(&self, message: Message) -> Result<()> {
        self.append_all(vec![message]).await
    }

    /// Appends several messages as one mutation.
    pub async fn append_all(&self, messages: Vec<Message>) -> Result<()> {
        for message in &messages {
            self.ids.observe(message.id);
        }
        tracing::debug!("[MessageStore] append {} message(s)", messages.len());
        self.transform(move |mut current| {
            current.extend(messages);
            (current, ())
        })
        .await
    }

    /// Replaces the last message, or appends when the store is empty.
    pub async fn replace_last(&self, message: Message) -> Result<()> {
        self.ids.observe(message.id);
        self.transform(move |mut current| {
            current.pop();
            current.push(message);
            (current, ())
        })
        .await
    }

    /// Inserts `message` directly after the message with id `anchor`.
    ///
    /// Returns `false` when the anchor is missing; nothing is inserted.
    pub async fn insert_after(&self, anchor: MessageId, message: Message) -> Result<bool> {
        self.ids.observe(message.id);
        self.transform(move |mut current| match current.iter().position(|m| m.id == anchor) {
            Some(index) => {
                current.insert(index + 1, message);
                (current, true)
            }
            None => (current, false),
        })
        .await
    }

    /// Applies `patch` to the message with id `id`.
    ///
    /// Returns `false` when no message matches.
    pub async fn update_by_id(&self, id: MessageId, patch: MessagePatch) -> Result<bool> {
        tracing::debug!("[MessageStore] update_by_id {}", id);
        self.transform(move |mut current| match current.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                patch.apply(message);
                (current, true)
            }
            None => (current, false),
        })
        .await
    }

    /// Removes the failed translation entry `error_id` from message `id`.
    ///
    /// Returns `false` when the message or the entry is missing.
    pub async fn dismiss_translation_error(&self, id: MessageId, error_id: &str) -> Result<bool> {
        tracing::debug!("[MessageStore] dismiss {} on message {}", error_id, id);
        self.transform(|mut current| {
            let dismissed = match current.iter_mut().find(|m| m.id == id) {
                Some(message) => {
                    let before = message.translations.len();
                    message.translations.retain(|t| {
                        !matches!(t, Translation::Error { error_id: e, .. } if e == error_id)
                    });
                    message.translations.len() < before
                }
                None => false,
            };
            (current, dismissed)
        })
        .await
    }

    /// Removes every message matching `predicate`, returning how many went.
    pub async fn remove_where<P>(&self, predicate: P) -> Result<usize>
    where
        P: Fn(&Message) -> bool,
    {
        self.transform(move |current| {
            let before = current.len();
            let next: Vec<Message> = current.into_iter().filter(|m| !predicate(m)).collect();
            let removed = before - next.len();
            (next, removed)
        })
        .await
    }

    /// Empties the store and deletes the persisted history.
    pub async fn clear(&self) -> Result<()> {
        let mut guard = self.messages.write().await;
        guard.clear();
        tracing::info!("[MessageStore] Chat history cleared");
        self.repository.clear().await
    }
}

fn settle_interrupted(messages: Vec<Message>) -> Vec<Message> {
    let before = messages.len();
    let mut reset = 0;
    let settled: Vec<Message> = messages
        .into_iter()
        .filter(|m| !m.is_placeholder())
        .map(|mut m| {
            if m.clear_in_flight() {
                reset += 1;
            }
            m
        })
        .collect();

    let dropped = before - settled.len();
    if dropped > 0 || reset > 0 {
        tracing::warn!(
            "[MessageStore] Settled interrupted work: dropped {} placeholder(s), reset {} message(s)",
            dropped,
            reset
        );
    }
    settled
}
