//! Chat service facade.
//!
//! `ChatService` wires the message store and the three orchestrators together
//! and owns the presentation state that is not persisted with messages: the
//! input buffer, the error banner, and the target language selected for each
//! message.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lingua_core::capability::{Capabilities, ProgressSink, TracingProgress};
use lingua_core::config::LinguaConfig;
use lingua_core::error::{LinguaError, Result};
use lingua_core::message::{HistoryRepository, Message, MessageId};
use lingua_core::preference::PreferenceRepository;

use crate::capability_probe::{CapabilityReport, UNSUPPORTED_BANNER, probe_capabilities};
use crate::detection::{DetectionOrchestrator, SendOutcome};
use crate::message_store::MessageStore;
use crate::summarization::{SummarizationOrchestrator, SummarizeOutcome};
use crate::translation::{TranslateOutcome, TranslationOrchestrator};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Per-message target language selection.
///
/// A selection is consumed by the translation attempt it triggers, so every
/// attempt starts from an unset control.
#[derive(Debug, Default)]
pub struct ControlState {
    selected: HashMap<MessageId, String>,
}

impl ControlState {
    pub fn select(&mut self, id: MessageId, language: impl Into<String>) {
        self.selected.insert(id, language.into());
    }

    pub fn selected(&self, id: MessageId) -> Option<&str> {
        self.selected.get(&id).map(String::as_str)
    }

    /// Returns the selection for `id` and resets it.
    pub fn take(&mut self, id: MessageId) -> Option<String> {
        self.selected.remove(&id)
    }
}

pub struct ChatService {
    store: Arc<MessageStore>,
    detection: Option<DetectionOrchestrator>,
    translation: TranslationOrchestrator,
    summarization: SummarizationOrchestrator,
    preferences: Arc<dyn PreferenceRepository>,
    report: CapabilityReport,
    input: Mutex<String>,
    error: Mutex<Option<String>>,
    controls: Mutex<ControlState>,
    dark_mode: AtomicBool,
    pending_sends: AtomicUsize,
}

impl ChatService {
    /// Loads history and preferences and probes the providers.
    pub async fn open(
        history: Arc<dyn HistoryRepository>,
        preferences: Arc<dyn PreferenceRepository>,
        capabilities: Capabilities,
        config: &LinguaConfig,
    ) -> Self {
        let store = Arc::new(MessageStore::open(history).await);
        let report = probe_capabilities(&capabilities).await;
        let progress: Arc<dyn ProgressSink> = Arc::new(TracingProgress);

        let dark_mode = preferences.dark_mode().await.unwrap_or_else(|e| {
            tracing::warn!("[ChatService] Could not read dark mode preference: {}", e);
            false
        });

        let detection = match (report.can_send(), capabilities.detector) {
            (true, Some(detector)) => Some(DetectionOrchestrator::new(
                store.clone(),
                detector,
                config.timing.detection_delay(),
            )),
            _ => None,
        };

        Self {
            translation: TranslationOrchestrator::new(
                store.clone(),
                capabilities.translator,
                progress.clone(),
                config.timing.translation_delay(),
            ),
            summarization: SummarizationOrchestrator::new(
                store.clone(),
                capabilities.summarizer,
                config.summarizer.clone(),
                progress,
            ),
            store,
            detection,
            preferences,
            report,
            input: Mutex::new(String::new()),
            error: Mutex::new(report.banner().map(str::to_string)),
            controls: Mutex::new(ControlState::default()),
            dark_mode: AtomicBool::new(dark_mode),
            pending_sends: AtomicUsize::new(0),
        }
    }

    pub fn store(&self) -> &Arc<MessageStore> {
        &self.store
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.store.snapshot().await
    }

    pub fn capability_report(&self) -> CapabilityReport {
        self.report
    }

    pub fn can_send(&self) -> bool {
        self.detection.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.pending_sends.load(Ordering::SeqCst) > 0
    }

    pub fn is_translating(&self) -> bool {
        self.translation.is_translating()
    }

    // ============================================================================
    // Input and send
    // ============================================================================

    pub fn set_input(&self, text: impl Into<String>) {
        *lock(&self.input) = text.into();
    }

    pub fn input(&self) -> String {
        lock(&self.input).clone()
    }

    /// Sends the input buffer.
    ///
    /// The buffer is cleared as soon as the message is accepted. A detection
    /// failure also raises the error banner.
    pub async fn send(&self) -> Result<SendOutcome> {
        let Some(detection) = &self.detection else {
            self.raise(UNSUPPORTED_BANNER);
            return Err(LinguaError::unavailable(UNSUPPORTED_BANNER));
        };

        let text = {
            let mut input = lock(&self.input);
            if input.trim().is_empty() {
                return Ok(SendOutcome::Ignored);
            }
            std::mem::take(&mut *input)
        };

        self.pending_sends.fetch_add(1, Ordering::SeqCst);
        let outcome = detection.send(&text).await;
        self.pending_sends.fetch_sub(1, Ordering::SeqCst);

        if let Ok(SendOutcome::Failed { error, .. }) = &outcome {
            self.raise(error);
        }
        outcome
    }

    /// Replaces the input buffer with `text` and sends it.
    pub async fn send_text(&self, text: &str) -> Result<SendOutcome> {
        self.set_input(text);
        self.send().await
    }

    // ============================================================================
    // Translation
    // ============================================================================

    pub fn select_target(&self, id: MessageId, language: &str) {
        lock(&self.controls).select(id, language);
    }

    pub fn selected_target(&self, id: MessageId) -> Option<String> {
        lock(&self.controls).selected(id).map(str::to_string)
    }

    /// Translates `id` into its selected target, then resets the selection.
    pub async fn translate(&self, id: MessageId) -> Result<TranslateOutcome> {
        let target = lock(&self.controls).take(id).unwrap_or_default();
        self.translation.translate(id, &target).await
    }

    /// Selects `language` for `id` and translates.
    pub async fn translate_to(&self, id: MessageId, language: &str) -> Result<TranslateOutcome> {
        self.select_target(id, language);
        self.translate(id).await
    }

    /// Removes a failed translation entry from `id`'s list.
    pub async fn dismiss_translation_error(&self, id: MessageId, error_id: &str) -> Result<()> {
        if self.store.dismiss_translation_error(id, error_id).await? {
            Ok(())
        } else {
            Err(LinguaError::operation(format!(
                "No translation error {} on message {}",
                error_id, id
            )))
        }
    }

    pub async fn summarize(&self, id: MessageId) -> Result<SummarizeOutcome> {
        self.summarization.summarize(id).await
    }

    // ============================================================================
    // Chat-wide state
    // ============================================================================

    pub async fn clear_chat(&self) -> Result<()> {
        self.store.clear().await?;
        *lock(&self.controls) = ControlState::default();
        Ok(())
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode.load(Ordering::SeqCst)
    }

    /// Flips the dark mode preference and persists it.
    ///
    /// The in-memory flag only changes once the new value is saved.
    pub async fn toggle_dark_mode(&self) -> Result<bool> {
        let enabled = !self.dark_mode();
        self.preferences.set_dark_mode(enabled).await?;
        self.dark_mode.store(enabled, Ordering::SeqCst);
        tracing::debug!("[ChatService] Dark mode {}", enabled);
        Ok(enabled)
    }

    pub fn error(&self) -> Option<String> {
        lock(&self.error).clone()
    }

    /// Hides the banner. The capability banner cannot be dismissed.
    pub fn dismiss_error(&self) {
        *lock(&self.error) = self.report.banner().map(str::to_string);
    }

    fn raise(&self, message: &str) {
        *lock(&self.error) = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::detection::DETECTION_FAILED_MESSAGE;
    use crate::testing::{ScriptedDetector, ScriptedSummarizer, ScriptedTranslator, memory_history};
    use lingua_core::PreconditionFailure;
    use lingua_core::config::TimingConfig;
    use lingua_core::storage::{DARK_MODE_SLOT, HISTORY_SLOT, KeyValueStore};
    use lingua_infrastructure::{MemoryKeyValueStore, SlotPreferenceRepository};

    fn config() -> LinguaConfig {
        LinguaConfig {
            timing: TimingConfig::immediate(),
            ..LinguaConfig::default()
        }
    }

    fn full_capabilities() -> Capabilities {
        Capabilities::new(
            Arc::new(
                ScriptedDetector::new()
                    .answer("Bonjour", "fr", 0.95)
                    .answer("hi", "en", 0.5),
            ),
            Arc::new(ScriptedTranslator::new()),
            Arc::new(ScriptedSummarizer::new()),
        )
    }

    async fn service(capabilities: Capabilities) -> (ChatService, Arc<MemoryKeyValueStore>) {
        let (history, slots) = memory_history();
        let preferences = Arc::new(SlotPreferenceRepository::new(slots.clone()));
        let chat = ChatService::open(history, preferences, capabilities, &config()).await;
        (chat, slots)
    }

    #[tokio::test]
    async fn test_send_clears_input_and_detects() {
        let (chat, _) = service(full_capabilities()).await;
        chat.set_input("Bonjour");

        let outcome = chat.send().await.unwrap();
        assert!(matches!(outcome, SendOutcome::Detected { .. }));
        assert_eq!(chat.input(), "");
        assert!(!chat.is_loading());
        assert_eq!(chat.messages().await.len(), 2);
    }

    #[tokio::test]
    async fn test_blank_input_keeps_buffer() {
        let (chat, _) = service(full_capabilities()).await;
        chat.set_input("   ");
        assert_eq!(chat.send().await.unwrap(), SendOutcome::Ignored);
        assert_eq!(chat.input(), "   ");
    }

    #[tokio::test]
    async fn test_detection_failure_raises_banner() {
        let (chat, _) = service(full_capabilities()).await;
        chat.send_text("zzzz").await.unwrap();
        assert_eq!(chat.error().as_deref(), Some(DETECTION_FAILED_MESSAGE));

        chat.dismiss_error();
        assert_eq!(chat.error(), None);
    }

    #[tokio::test]
    async fn test_missing_capability_disables_send() {
        let capabilities = Capabilities {
            detector: Some(Arc::new(ScriptedDetector::new())),
            translator: None,
            summarizer: None,
        };
        let (chat, _) = service(capabilities).await;

        assert!(!chat.can_send());
        assert_eq!(chat.error().as_deref(), Some(UNSUPPORTED_BANNER));

        let result = chat.send_text("Bonjour").await;
        assert!(result.unwrap_err().is_unavailable());
        assert!(chat.messages().await.is_empty());

        chat.dismiss_error();
        assert_eq!(chat.error().as_deref(), Some(UNSUPPORTED_BANNER));
    }

    #[tokio::test]
    async fn test_selection_resets_after_each_attempt() {
        let (chat, _) = service(full_capabilities()).await;
        let SendOutcome::Detected { result_message_id: id, .. } =
            chat.send_text("Bonjour").await.unwrap()
        else {
            panic!("detection failed");
        };

        chat.select_target(id, "en");
        assert_eq!(chat.selected_target(id).as_deref(), Some("en"));
        chat.translate(id).await.unwrap();
        assert_eq!(chat.selected_target(id), None);

        let unset = chat.translate(id).await;
        assert!(matches!(
            unset,
            Err(LinguaError::PreconditionFailed(PreconditionFailure::TargetLanguageUnset))
        ));

        chat.select_target(id, "fr");
        assert!(chat.translate(id).await.unwrap_err().is_precondition());
        assert_eq!(chat.selected_target(id), None);
    }

    #[tokio::test]
    async fn test_dark_mode_is_persisted() {
        let (chat, slots) = service(full_capabilities()).await;
        assert!(!chat.dark_mode());

        assert!(chat.toggle_dark_mode().await.unwrap());
        assert_eq!(slots.get(DARK_MODE_SLOT).await.unwrap().as_deref(), Some("true"));

        assert!(!chat.toggle_dark_mode().await.unwrap());
        assert!(!chat.dark_mode());
    }

    struct ReadOnlyPreferences;

    #[async_trait]
    impl PreferenceRepository for ReadOnlyPreferences {
        async fn dark_mode(&self) -> Result<bool> {
            Ok(false)
        }

        async fn set_dark_mode(&self, _enabled: bool) -> Result<()> {
            Err(LinguaError::io("read-only file system"))
        }
    }

    #[tokio::test]
    async fn test_failed_dark_mode_save_keeps_flag() {
        let (history, _) = memory_history();
        let chat = ChatService::open(
            history,
            Arc::new(ReadOnlyPreferences),
            full_capabilities(),
            &config(),
        )
        .await;

        assert!(chat.toggle_dark_mode().await.is_err());
        assert!(!chat.dark_mode());
    }

    #[tokio::test]
    async fn test_dismiss_one_of_two_translation_errors() {
        let translator = ScriptedTranslator::new().failing("es");
        let capabilities = Capabilities::new(
            Arc::new(ScriptedDetector::new().answer("Bonjour", "fr", 0.95)),
            Arc::new(translator),
            Arc::new(ScriptedSummarizer::new()),
        );
        let (chat, _) = service(capabilities).await;
        let SendOutcome::Detected { result_message_id: id, .. } =
            chat.send_text("Bonjour").await.unwrap()
        else {
            panic!("detection failed");
        };

        let mut error_ids = Vec::new();
        for _ in 0..2 {
            match chat.translate_to(id, "es").await.unwrap() {
                TranslateOutcome::Failed { error_id, .. } => error_ids.push(error_id),
                other => panic!("unexpected outcome: {:?}", other),
            }
        }

        chat.dismiss_translation_error(id, &error_ids[0]).await.unwrap();
        let remaining = chat.store().find(id).await.unwrap().translations;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].anchor_key(), error_ids[1]);

        assert!(chat.dismiss_translation_error(id, &error_ids[0]).await.is_err());
    }

    #[tokio::test]
    async fn test_clear_chat_empties_history_slot() {
        let (chat, slots) = service(full_capabilities()).await;
        chat.send_text("hi").await.unwrap();
        assert!(slots.get(HISTORY_SLOT).await.unwrap().is_some());

        chat.clear_chat().await.unwrap();
        assert!(chat.messages().await.is_empty());
        assert!(slots.get(HISTORY_SLOT).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_short_text_narration() {
        let (chat, _) = service(full_capabilities()).await;
        chat.send_text("hi").await.unwrap();
        let messages = chat.messages().await;
        assert_eq!(
            messages[1].text,
            "It's a short text, but I'm fairly sure you're typing in English!"
        );
    }
}
