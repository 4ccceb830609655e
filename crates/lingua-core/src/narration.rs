//! Human-readable narration of detection results.

use isolang::Language;

/// Texts shorter than this many characters use the short-text wording.
const SHORT_TEXT_CHARS: usize = 4;

/// Maps a detection confidence to a sentence prefix.
///
/// Pure function of `(confidence, text length)`. Short texts with any
/// reasonable confidence get their own wording regardless of the band.
pub fn get_confidence_message(confidence: f64, text: &str) -> &'static str {
    let is_short_text = text.chars().count() < SHORT_TEXT_CHARS;

    if is_short_text && confidence > 0.3 {
        return "It's a short text, but I'm fairly sure";
    }

    if confidence > 0.85 {
        "I'm very confident"
    } else if confidence > 0.6 {
        "I'm fairly sure"
    } else if confidence > 0.4 {
        "It seems likely"
    } else {
        "It's uncertain, but it could be"
    }
}

/// English display name for a language tag, falling back to the tag.
///
/// Only the primary subtag is looked up, so `"pt-BR"` resolves to
/// "Portuguese".
pub fn get_language_name(tag: &str) -> String {
    let primary = tag.split(['-', '_']).next().unwrap_or(tag).to_ascii_lowercase();

    let language = match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => Language::from_639_3(&primary),
        _ => None,
    };

    language
        .map(|lang| lang.to_name().to_string())
        .unwrap_or_else(|| tag.to_string())
}

/// The sentence shown in place of the "Analyzing..." placeholder.
pub fn detection_narration(confidence: f64, text: &str, language: &str) -> String {
    format!(
        "{} you're typing in {}!",
        get_confidence_message(confidence, text),
        get_language_name(language)
    )
}
