use super::model::{Message, Translation};

/// A partial update applied to one message by id.
///
/// Unset fields leave the message untouched. `summary_error` is doubly
/// optional so a patch can clear it explicitly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessagePatch {
    pub is_analyzing: Option<bool>,
    pub detected_language: Option<String>,
    pub is_summarizing: Option<bool>,
    pub summary: Option<String>,
    pub summary_error: Option<Option<String>>,
    pub translation: Option<Translation>,
}

impl MessagePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analyzing(mut self, value: bool) -> Self {
        self.is_analyzing = Some(value);
        self
    }

    pub fn detected_language(mut self, language: impl Into<String>) -> Self {
        self.detected_language = Some(language.into());
        self
    }

    pub fn summarizing(mut self, value: bool) -> Self {
        self.is_summarizing = Some(value);
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn summary_error(mut self, error: Option<String>) -> Self {
        self.summary_error = Some(error);
        self
    }

    pub fn push_translation(mut self, translation: Translation) -> Self {
        self.translation = Some(translation);
        self
    }

    /// Applies the patch. A translation whose language is already present is
    /// dropped so the per-language uniqueness invariant holds.
    pub fn apply(self, message: &mut Message) {
        if let Some(value) = self.is_analyzing {
            message.is_analyzing = value;
        }
        if let Some(language) = self.detected_language {
            message.detected_language = Some(language);
        }
        if let Some(value) = self.is_summarizing {
            message.is_summarizing = value;
        }
        if let Some(summary) = self.summary {
            message.summary = Some(summary);
        }
        if let Some(error) = self.summary_error {
            message.summary_error = error;
        }
        if let Some(translation) = self.translation {
            if !message.push_translation(translation) {
                tracing::warn!(
                    "Dropped duplicate translation for message {}",
                    message.id
                );
            }
        }
    }
}
