//! Language detection for newly sent messages.

use std::sync::Arc;
use std::time::Duration;

use lingua_core::capability::{Detection, LanguageDetector};
use lingua_core::error::Result;
use lingua_core::message::{Message, MessageId};
use lingua_core::narration::detection_narration;

use crate::message_store::MessageStore;

/// Banner text shown when the detector rejects a message.
pub const DETECTION_FAILED_MESSAGE: &str = "Failed to detect language. Please try again.";

/// Result of a `send`.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The input was blank; nothing was stored.
    Ignored,
    Detected {
        user_message_id: MessageId,
        result_message_id: MessageId,
        detection: Detection,
    },
    /// Detection failed. The placeholder is gone and the user message stays.
    Failed {
        user_message_id: MessageId,
        error: String,
    },
}

/// Appends user messages and narrates their detected language.
///
/// Each `send` owns its own placeholder/result pair, so overlapping sends
/// never interfere.
pub struct DetectionOrchestrator {
    store: Arc<MessageStore>,
    detector: Arc<dyn LanguageDetector>,
    settle_delay: Duration,
}

impl DetectionOrchestrator {
    pub fn new(
        store: Arc<MessageStore>,
        detector: Arc<dyn LanguageDetector>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            store,
            detector,
            settle_delay,
        }
    }

    pub async fn send(&self, raw_text: &str) -> Result<SendOutcome> {
        if raw_text.trim().is_empty() {
            return Ok(SendOutcome::Ignored);
        }

        let user_message_id = self.store.next_id();
        let placeholder_id = self.store.next_id();
        self.store
            .append_all(vec![
                Message::user(user_message_id, raw_text),
                Message::analyzing_placeholder(placeholder_id),
            ])
            .await?;
        tracing::debug!(
            "[Detection] Message {} queued (placeholder {})",
            user_message_id,
            placeholder_id
        );

        tokio::time::sleep(self.settle_delay).await;

        match self.detector.detect(raw_text).await {
            Ok(detection) => {
                let narration =
                    detection_narration(detection.confidence, raw_text, &detection.language);
                let result =
                    Message::detection_result(placeholder_id, narration, &detection.language, raw_text);
                let language = detection.language.clone();

                self.store
                    .transform(move |current| {
                        let next = current
                            .into_iter()
                            .map(|mut m| {
                                if m.id == user_message_id {
                                    m.is_analyzing = false;
                                    m.detected_language = Some(language.clone());
                                    m
                                } else if m.id == placeholder_id {
                                    result.clone()
                                } else {
                                    m
                                }
                            })
                            .collect();
                        (next, ())
                    })
                    .await?;

                tracing::info!(
                    "[Detection] Message {} detected as {} ({:.2})",
                    user_message_id,
                    detection.language,
                    detection.confidence
                );
                Ok(SendOutcome::Detected {
                    user_message_id,
                    result_message_id: placeholder_id,
                    detection,
                })
            }
            Err(e) => {
                tracing::warn!("[Detection] Message {} failed: {}", user_message_id, e);

                self.store
                    .transform(move |current| {
                        let next = current
                            .into_iter()
                            .filter(|m| m.id != placeholder_id)
                            .map(|mut m| {
                                if m.id == user_message_id {
                                    m.is_analyzing = false;
                                }
                                m
                            })
                            .collect();
                        (next, ())
                    })
                    .await?;

                Ok(SendOutcome::Failed {
                    user_message_id,
                    error: DETECTION_FAILED_MESSAGE.to_string(),
                })
            }
        }
    }
}
