//! Application layer for Lingua.
//!
//! Use cases that coordinate the message store with the language capability
//! providers: detection on send, single-flight translation, and summaries.

pub mod capability_probe;
pub mod chat;
pub mod detection;
pub mod message_store;
pub mod summarization;
pub mod translation;

#[cfg(test)]
mod testing;

pub use capability_probe::{CapabilityReport, UNSUPPORTED_BANNER, probe_capabilities};
pub use chat::{ChatService, ControlState};
pub use detection::{DETECTION_FAILED_MESSAGE, DetectionOrchestrator, SendOutcome};
pub use message_store::MessageStore;
pub use summarization::{SummarizationOrchestrator, SummarizeOutcome, summarize_action_label};
pub use translation::{TranslateOutcome, TranslationOrchestrator};
