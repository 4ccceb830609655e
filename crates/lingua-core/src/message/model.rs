//! Conversation message types.
//!
//! `Message` is the only persisted entity. Field names serialize in camelCase
//! so the history slot keeps the same layout the web front-end used.

use serde::{Deserialize, Serialize};

use super::{MessageId, new_error_id};

/// Display text of the placeholder inserted while detection runs.
pub const ANALYZING_TEXT: &str = "Analyzing your message...";

/// Display text of the placeholder inserted while a translation runs.
pub const TRANSLATING_TEXT: &str = "Translating...";

/// Messages must be strictly longer than this to be offered a summary.
pub const SUMMARIZE_MIN_LENGTH: usize = 150;

/// The only detected language for which summaries are offered.
pub const SUMMARIZE_LANGUAGE: &str = "en";

/// Language marker used on the wire for failed translation entries.
const ERROR_LANGUAGE: &str = "error";

/// One entry in a message's translation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TranslationRecord", into = "TranslationRecord")]
pub enum Translation {
    /// A completed translation into `language`.
    Success { language: String, text: String },
    /// A failed attempt. `error_id` is unique per failure so repeated
    /// failures coexist in the list.
    Error { text: String, error_id: String },
}

impl Translation {
    pub fn success(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Success {
            language: language.into(),
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>, error_id: impl Into<String>) -> Self {
        Self::Error {
            text: text.into(),
            error_id: error_id.into(),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Success { text, .. } | Self::Error { text, .. } => text,
        }
    }

    /// Language of a successful entry, `None` for errors.
    pub fn language(&self) -> Option<&str> {
        match self {
            Self::Success { language, .. } => Some(language),
            Self::Error { .. } => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Key used to build the entry's anchor: the language for successes,
    /// the error id for failures.
    pub fn anchor_key(&self) -> &str {
        match self {
            Self::Success { language, .. } => language,
            Self::Error { error_id, .. } => error_id,
        }
    }
}

/// Flat wire form: `{language, text}` or `{language: "error", text, errorId}`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslationRecord {
    language: String,
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_id: Option<String>,
}

impl From<TranslationRecord> for Translation {
    fn from(record: TranslationRecord) -> Self {
        match record.error_id {
            Some(error_id) => Translation::Error {
                text: record.text,
                error_id,
            },
            // Older histories stored errors without an id.
            None if record.language == ERROR_LANGUAGE => Translation::Error {
                text: record.text,
                error_id: new_error_id(),
            },
            None => Translation::Success {
                language: record.language,
                text: record.text,
            },
        }
    }
}

impl From<Translation> for TranslationRecord {
    fn from(translation: Translation) -> Self {
        match translation {
            Translation::Success { language, text } => TranslationRecord {
                language,
                text,
                error_id: None,
            },
            Translation::Error { text, error_id } => TranslationRecord {
                language: ERROR_LANGUAGE.to_string(),
                text,
                error_id: Some(error_id),
            },
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A single message in the chat log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique, strictly increasing. Doubles as display order.
    pub id: MessageId,
    /// Displayed content.
    pub text: String,
    /// Whether the human wrote this message.
    pub is_user: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_language: Option<String>,
    /// Text to translate or summarize, independent of `text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
    /// Character count of the original input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_length: Option<usize>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_analyzing: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_translating: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_summarizing: bool,
    /// Set on "Translating..." placeholders: the message being translated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_message_id: Option<MessageId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub translations: Vec<Translation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_error: Option<String>,
}

impl Message {
    fn base(id: MessageId, text: impl Into<String>, is_user: bool) -> Self {
        Self {
            id,
            text: text.into(),
            is_user,
            detected_language: None,
            original_text: None,
            text_length: None,
            is_analyzing: false,
            is_translating: false,
            is_summarizing: false,
            original_message_id: None,
            translations: Vec::new(),
            summary: None,
            summary_error: None,
        }
    }

    /// A message typed by the user, marked as awaiting detection.
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        let text = text.into();
        let mut message = Self::base(id, text.clone(), true);
        message.text_length = Some(text.chars().count());
        message.original_text = Some(text);
        message.is_analyzing = true;
        message
    }

    /// A plain system narration.
    pub fn system(id: MessageId, text: impl Into<String>) -> Self {
        Self::base(id, text, false)
    }

    /// The transient "Analyzing..." entry that follows a user message.
    pub fn analyzing_placeholder(id: MessageId) -> Self {
        let mut message = Self::base(id, ANALYZING_TEXT, false);
        message.is_analyzing = true;
        message
    }

    /// The transient "Translating..." entry inserted after `original`.
    pub fn translating_placeholder(id: MessageId, original: MessageId) -> Self {
        let mut message = Self::base(id, TRANSLATING_TEXT, false);
        message.is_translating = true;
        message.original_message_id = Some(original);
        message
    }

    /// The system message that replaces the "Analyzing..." placeholder.
    pub fn detection_result(
        id: MessageId,
        narration: impl Into<String>,
        language: impl Into<String>,
        original_text: impl Into<String>,
    ) -> Self {
        let mut message = Self::base(id, narration, false);
        message.detected_language = Some(language.into());
        message.original_text = Some(original_text.into());
        message
    }

    /// True for entries that only narrate an in-flight operation.
    pub fn is_placeholder(&self) -> bool {
        !self.is_user && (self.is_analyzing || self.is_translating)
    }

    /// True for the "Translating..." placeholder narrating `original`.
    pub fn is_translation_placeholder_for(&self, original: MessageId) -> bool {
        self.is_translating && self.original_message_id == Some(original)
    }

    /// Whether a summarize action may be offered for this message.
    pub fn can_summarize(&self) -> bool {
        self.is_user
            && self.detected_language.as_deref() == Some(SUMMARIZE_LANGUAGE)
            && self.text_length.is_some_and(|len| len > SUMMARIZE_MIN_LENGTH)
            && !self.is_analyzing
    }

    /// Whether translation controls apply: a detection result not mid-flight.
    pub fn can_translate(&self) -> bool {
        !self.is_user && self.detected_language.is_some() && !self.is_translating
    }

    /// Clears in-flight flags left behind by an interrupted session.
    ///
    /// Returns `true` when anything changed.
    pub fn clear_in_flight(&mut self) -> bool {
        let was_in_flight = self.is_analyzing || self.is_translating || self.is_summarizing;
        self.is_analyzing = false;
        self.is_translating = false;
        self.is_summarizing = false;
        was_in_flight
    }

    pub fn has_translation(&self, language: &str) -> bool {
        self.translations
            .iter()
            .any(|t| t.language() == Some(language))
    }

    /// Appends a translation entry.
    ///
    /// Returns `false` and leaves the list unchanged when a successful entry
    /// for the same language already exists.
    pub fn push_translation(&mut self, translation: Translation) -> bool {
        if let Some(language) = translation.language() {
            if self.has_translation(language) {
                return false;
            }
        }
        self.translations.push(translation);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english_user_message(len: usize) -> Message {
        let mut message = Message::user(1, "a".repeat(len));
        message.detected_language = Some("en".to_string());
        message.is_analyzing = false;
        message
    }

    #[test]
    fn test_user_message_records_length_and_original() {
        let message = Message::user(7, "héllo");
        assert!(message.is_user);
        assert!(message.is_analyzing);
        assert_eq!(message.text_length, Some(5));
        assert_eq!(message.original_text.as_deref(), Some("héllo"));
    }

    #[test]
    fn test_can_summarize_requires_long_english_text() {
        assert!(!english_user_message(100).can_summarize());
        assert!(!english_user_message(150).can_summarize());
        assert!(english_user_message(151).can_summarize());
    }

    #[test]
    fn test_can_summarize_rejects_other_languages_and_analyzing() {
        let mut french = english_user_message(200);
        french.detected_language = Some("fr".to_string());
        assert!(!french.can_summarize());

        let mut analyzing = english_user_message(200);
        analyzing.is_analyzing = true;
        assert!(!analyzing.can_summarize());

        let mut system = english_user_message(200);
        system.is_user = false;
        assert!(!system.can_summarize());
    }

    #[test]
    fn test_push_translation_rejects_duplicate_language() {
        let mut message = Message::detection_result(2, "narration", "fr", "Bonjour");
        assert!(message.push_translation(Translation::success("en", "Hello")));
        assert!(!message.push_translation(Translation::success("en", "Hi")));
        assert!(message.push_translation(Translation::error("boom", "error-1")));
        assert!(message.push_translation(Translation::error("boom", "error-2")));
        assert_eq!(message.translations.len(), 3);
        assert_eq!(message.translations[0].text(), "Hello");
    }

    #[test]
    fn test_translation_wire_format() {
        let entries = vec![
            Translation::success("es", "Hola"),
            Translation::error("Translation failed", "error-42"),
        ];
        let json = serde_json::to_value(&entries).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"language": "es", "text": "Hola"},
                {"language": "error", "text": "Translation failed", "errorId": "error-42"}
            ])
        );

        let back: Vec<Translation> = serde_json::from_value(json).unwrap();
        assert_eq!(back, entries);
    }

    #[test]
    fn test_legacy_errors_get_distinct_ids() {
        let json = serde_json::json!([
            {"language": "error", "text": "Service down"},
            {"language": "error", "text": "Service down"}
        ]);
        let entries: Vec<Translation> = serde_json::from_value(json).unwrap();

        assert!(entries.iter().all(Translation::is_error));
        assert!(entries[0].anchor_key().starts_with("error-"));
        assert_ne!(entries[0].anchor_key(), entries[1].anchor_key());
    }

    #[test]
    fn test_message_uses_camel_case_and_skips_false_flags() {
        let message = Message::detection_result(3, "I'm very confident", "fr", "Bonjour");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["isUser"], serde_json::json!(false));
        assert_eq!(json["detectedLanguage"], serde_json::json!("fr"));
        assert!(json.get("isAnalyzing").is_none());
        assert!(json.get("translations").is_none());
    }

    #[test]
    fn test_placeholders() {
        let analyzing = Message::analyzing_placeholder(10);
        assert!(analyzing.is_placeholder());
        assert_eq!(analyzing.text, ANALYZING_TEXT);

        let translating = Message::translating_placeholder(11, 4);
        assert!(translating.is_placeholder());
        assert!(translating.is_translation_placeholder_for(4));
        assert!(!translating.is_translation_placeholder_for(5));
    }
}
