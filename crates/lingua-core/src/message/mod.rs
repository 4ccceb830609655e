//! Message domain module.
//!
//! # Module Structure
//!
//! - `model`: the persisted `Message` and its `Translation` entries
//! - `patch`: partial updates applied through the message store
//! - `id`: monotonic id generation
//! - `anchor`: stable identifiers for rendered message parts
//! - `repository`: persistence interface for the chat history slot

mod anchor;
mod id;
mod model;
mod patch;
mod repository;

/// Message identity. Strictly increasing in insertion order.
pub type MessageId = u64;

pub use anchor::{summary_anchor, translation_anchor};
pub use id::{MessageIdGenerator, new_error_id};
pub use model::{
    ANALYZING_TEXT, Message, SUMMARIZE_LANGUAGE, SUMMARIZE_MIN_LENGTH, TRANSLATING_TEXT,
    Translation,
};
pub use patch::MessagePatch;
pub use repository::HistoryRepository;
