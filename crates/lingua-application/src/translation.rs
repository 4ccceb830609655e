//! Translation of detected messages, one at a time.
//!
//! The orchestrator admits a single translation at a time through an explicit
//! gate. A second request while one is in flight gets `TranslateOutcome::Busy`
//! back instead of being queued.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use lingua_core::PreconditionFailure;
use lingua_core::capability::{
    CapabilityError, ProgressSink, TranslatorFactory, create_translation_session,
};
use lingua_core::error::{LinguaError, Result};
use lingua_core::message::{Message, MessageId, Translation, new_error_id, translation_anchor};

use crate::message_store::MessageStore;

/// Error recorded when no translation provider is present.
pub const TRANSLATOR_MISSING_MESSAGE: &str =
    "Your browser does not support the translation service.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateOutcome {
    /// Another translation is running; nothing was changed.
    Busy { current: MessageId },
    Translated { anchor: String, language: String },
    /// An error entry was recorded on the message.
    Failed {
        anchor: String,
        error_id: String,
        message: String,
    },
}

impl TranslateOutcome {
    pub fn anchor(&self) -> Option<&str> {
        match self {
            Self::Busy { .. } => None,
            Self::Translated { anchor, .. } | Self::Failed { anchor, .. } => Some(anchor),
        }
    }
}

type FlightSlot = Mutex<Option<MessageId>>;

fn lock_slot(slot: &FlightSlot) -> MutexGuard<'_, Option<MessageId>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the single-flight slot; frees it when dropped.
struct FlightGuard<'a> {
    slot: &'a FlightSlot,
}

impl<'a> FlightGuard<'a> {
    /// Claims the slot for `id`, or reports who holds it.
    fn admit(slot: &'a FlightSlot, id: MessageId) -> std::result::Result<Self, MessageId> {
        let mut current = lock_slot(slot);
        if let Some(holder) = *current {
            return Err(holder);
        }
        *current = Some(id);
        Ok(Self { slot })
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        *lock_slot(self.slot) = None;
    }
}

pub struct TranslationOrchestrator {
    store: Arc<MessageStore>,
    translator: Option<Arc<dyn TranslatorFactory>>,
    progress: Arc<dyn ProgressSink>,
    smoothing_delay: Duration,
    in_flight: FlightSlot,
}

impl TranslationOrchestrator {
    pub fn new(
        store: Arc<MessageStore>,
        translator: Option<Arc<dyn TranslatorFactory>>,
        progress: Arc<dyn ProgressSink>,
        smoothing_delay: Duration,
    ) -> Self {
        Self {
            store,
            translator,
            progress,
            smoothing_delay,
            in_flight: Mutex::new(None),
        }
    }

    pub fn is_translating(&self) -> bool {
        lock_slot(&self.in_flight).is_some()
    }

    pub fn currently_translating_id(&self) -> Option<MessageId> {
        *lock_slot(&self.in_flight)
    }

    /// Translates message `id` into `target`.
    ///
    /// # Errors
    ///
    /// - `PreconditionFailed` when the message or target is unusable; the
    ///   store is left untouched
    /// - storage errors from persisting the history
    ///
    /// Provider failures are not errors: they are recorded on the message and
    /// reported as `TranslateOutcome::Failed`.
    pub async fn translate(&self, id: MessageId, target: &str) -> Result<TranslateOutcome> {
        let _guard = match FlightGuard::admit(&self.in_flight, id) {
            Ok(guard) => guard,
            Err(current) => {
                tracing::debug!(
                    "[Translation] Rejecting {} while {} is in flight",
                    id,
                    current
                );
                return Ok(TranslateOutcome::Busy { current });
            }
        };

        let (source, text) = self.check_preconditions(id, target).await?;

        let placeholder_id = self.store.next_id();
        self.store
            .insert_after(id, Message::translating_placeholder(placeholder_id, id))
            .await?;
        tracing::debug!("[Translation] {} -> {} for message {}", source, target, id);

        match self.run(&source, target, &text).await {
            Ok(translated) => {
                tokio::time::sleep(self.smoothing_delay).await;
                let entry = Translation::success(target, translated);
                self.settle(id, placeholder_id, entry).await?;
                tracing::info!("[Translation] Message {} translated to {}", id, target);
                Ok(TranslateOutcome::Translated {
                    anchor: translation_anchor(id, target),
                    language: target.to_string(),
                })
            }
            Err(message) => {
                tracing::warn!("[Translation] Message {} failed: {}", id, message);
                let error_id = new_error_id();
                let entry = Translation::error(message.clone(), error_id.clone());
                self.settle(id, placeholder_id, entry).await?;
                Ok(TranslateOutcome::Failed {
                    anchor: translation_anchor(id, &error_id),
                    error_id,
                    message,
                })
            }
        }
    }

    /// Returns the `(source language, original text)` to translate.
    async fn check_preconditions(&self, id: MessageId, target: &str) -> Result<(String, String)> {
        let message = self
            .store
            .find(id)
            .await
            .ok_or(PreconditionFailure::MessageNotFound(id))?;

        let source = message
            .detected_language
            .clone()
            .ok_or(PreconditionFailure::MissingSourceLanguage(id))?;
        let text = message
            .original_text
            .clone()
            .ok_or(PreconditionFailure::MissingOriginalText(id))?;

        if target.is_empty() {
            return Err(PreconditionFailure::TargetLanguageUnset.into());
        }
        if message.has_translation(target) {
            return Err(PreconditionFailure::AlreadyTranslated(target.to_string()).into());
        }
        if source == target {
            return Err(PreconditionFailure::SameLanguage(target.to_string()).into());
        }

        Ok((source, text))
    }

    /// Runs the provider, mapping every failure to the text recorded on the
    /// message.
    async fn run(&self, source: &str, target: &str, text: &str) -> std::result::Result<String, String> {
        let Some(translator) = &self.translator else {
            return Err(TRANSLATOR_MISSING_MESSAGE.to_string());
        };

        let session =
            create_translation_session(translator.as_ref(), source, target, self.progress.clone())
                .await
                .map_err(|e| format!("Translation setup failed: {}", e))?;

        session
            .translate(text)
            .await
            .map_err(|e: CapabilityError| e.to_string())
    }

    /// Removes the placeholder and appends `entry` in one mutation.
    async fn settle(
        &self,
        id: MessageId,
        placeholder_id: MessageId,
        entry: Translation,
    ) -> Result<()> {
        let recorded = self
            .store
            .transform(move |current| {
                let mut recorded = false;
                let next = current
                    .into_iter()
                    .filter(|m| m.id != placeholder_id)
                    .map(|mut m| {
                        if m.id == id {
                            recorded = m.push_translation(entry.clone());
                        }
                        m
                    })
                    .collect();
                (next, recorded)
            })
            .await?;

        if !recorded {
            // The message vanished (chat cleared) or gained the language meanwhile.
            return Err(LinguaError::operation(format!(
                "Translation result for message {} was discarded",
                id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Gate, ScriptedTranslator, memory_store};
    use lingua_core::capability::{Availability, TracingProgress};
    use lingua_core::message::TRANSLATING_TEXT;

    async fn store_with_french() -> Arc<MessageStore> {
        let store = memory_store().await;
        let mut user = Message::user(1, "Bonjour");
        user.is_analyzing = false;
        user.detected_language = Some("fr".into());
        store
            .append_all(vec![
                user,
                Message::detection_result(2, "I'm very confident you're typing in French!", "fr", "Bonjour"),
            ])
            .await
            .unwrap();
        store
    }

    fn orchestrator(store: Arc<MessageStore>, translator: ScriptedTranslator) -> TranslationOrchestrator {
        TranslationOrchestrator::new(
            store,
            Some(Arc::new(translator)),
            Arc::new(TracingProgress),
            Duration::from_millis(1000),
        )
    }

    fn precondition(result: Result<TranslateOutcome>) -> PreconditionFailure {
        match result {
            Err(LinguaError::PreconditionFailed(reason)) => reason,
            other => panic!("expected precondition failure, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_distinct_targets_record_one_entry_each_in_order() {
        let store = store_with_french().await;
        let translation = orchestrator(store.clone(), ScriptedTranslator::new());

        for target in ["en", "es", "pt"] {
            let outcome = translation.translate(2, target).await.unwrap();
            assert_eq!(
                outcome,
                TranslateOutcome::Translated {
                    anchor: format!("translation-2-{}", target),
                    language: target.to_string(),
                }
            );
        }

        let message = store.find(2).await.unwrap();
        let languages: Vec<_> = message.translations.iter().filter_map(|t| t.language()).collect();
        assert_eq!(languages, vec!["en", "es", "pt"]);
        assert_eq!(message.translations[1].text(), "[es] Bonjour");
        assert!(!translation.is_translating());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retranslating_same_language_is_rejected() {
        let store = store_with_french().await;
        let translation = orchestrator(store.clone(), ScriptedTranslator::new());

        translation.translate(2, "en").await.unwrap();
        let before = store.snapshot().await;

        assert_eq!(
            precondition(translation.translate(2, "en").await),
            PreconditionFailure::AlreadyTranslated("en".into())
        );
        assert_eq!(store.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_preconditions_leave_store_untouched() {
        let store = store_with_french().await;
        let translation = orchestrator(store.clone(), ScriptedTranslator::new());
        let before = store.snapshot().await;

        assert_eq!(
            precondition(translation.translate(99, "en").await),
            PreconditionFailure::MessageNotFound(99)
        );
        assert_eq!(
            precondition(translation.translate(2, "").await),
            PreconditionFailure::TargetLanguageUnset
        );
        assert_eq!(
            precondition(translation.translate(2, "fr").await),
            PreconditionFailure::SameLanguage("fr".into())
        );

        store.append(Message::system(3, "plain")).await.unwrap();
        assert_eq!(
            precondition(translation.translate(3, "en").await),
            PreconditionFailure::MissingSourceLanguage(3)
        );

        let after: Vec<_> = store.snapshot().await.into_iter().take(2).collect();
        assert_eq!(after, before);
        assert!(!translation.is_translating());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_records_error_entry_without_placeholder() {
        let store = store_with_french().await;
        let translation = orchestrator(store.clone(), ScriptedTranslator::new().failing("ru"));

        let first = translation.translate(2, "ru").await.unwrap();
        let second = translation.translate(2, "ru").await.unwrap();

        let (
            TranslateOutcome::Failed { error_id: a, message, anchor },
            TranslateOutcome::Failed { error_id: b, .. },
        ) = (first, second)
        else {
            panic!("expected two failures");
        };
        assert_ne!(a, b);
        assert_eq!(message, "Translation service crashed");
        assert_eq!(anchor, format!("translation-2-{}", a));

        let messages = store.snapshot().await;
        assert!(messages.iter().all(|m| m.text != TRANSLATING_TEXT));
        let errors: Vec<_> = messages[1].translations.iter().filter(|t| t.is_error()).collect();
        assert_eq!(errors.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsupported_pair_is_a_setup_failure() {
        let store = store_with_french().await;
        let translation = orchestrator(
            store.clone(),
            ScriptedTranslator::new().availability(Availability::No),
        );

        let outcome = translation.translate(2, "tr").await.unwrap();
        let TranslateOutcome::Failed { message, .. } = outcome else {
            panic!("expected failure");
        };
        assert_eq!(
            message,
            "Translation setup failed: Translation not supported for this language pair."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_translator_records_error() {
        let store = store_with_french().await;
        let translation = TranslationOrchestrator::new(
            store.clone(),
            None,
            Arc::new(TracingProgress),
            Duration::ZERO,
        );

        let outcome = translation.translate(2, "en").await.unwrap();
        assert!(matches!(
            outcome,
            TranslateOutcome::Failed { ref message, .. } if message == TRANSLATOR_MISSING_MESSAGE
        ));
    }

    #[tokio::test]
    async fn test_second_request_while_busy() {
        let store = store_with_french().await;
        let gate = Gate::closed();
        let translator = ScriptedTranslator::new().gated(gate.clone());
        let translation = Arc::new(TranslationOrchestrator::new(
            store.clone(),
            Some(Arc::new(translator)),
            Arc::new(TracingProgress),
            Duration::ZERO,
        ));

        let task = {
            let translation = translation.clone();
            tokio::spawn(async move { translation.translate(2, "en").await })
        };
        while !translation.is_translating() || store.len().await < 3 {
            tokio::task::yield_now().await;
        }

        assert_eq!(translation.currently_translating_id(), Some(2));
        let placeholder = &store.snapshot().await[2];
        assert!(placeholder.is_translation_placeholder_for(2));

        assert_eq!(
            translation.translate(2, "es").await.unwrap(),
            TranslateOutcome::Busy { current: 2 }
        );

        gate.release();
        task.await.unwrap().unwrap();
        assert!(!translation.is_translating());
        assert_eq!(store.find(2).await.unwrap().translations.len(), 1);
    }
}
