//! Stable identifiers for locating a message's rendered parts.
//!
//! Presentation layers use these to scroll newly produced entries into view;
//! the core only guarantees the naming.

use super::MessageId;

/// `key` is the target language for successes or the error id for failures.
pub fn translation_anchor(id: MessageId, key: &str) -> String {
    format!("translation-{}-{}", id, key)
}

pub fn summary_anchor(id: MessageId) -> String {
    format!("summary-{}", id)
}
