use thiserror::Error;

/// Failures reported by capability providers.
///
/// `Display` is the user-facing text recorded on the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    /// The provider is absent or refuses to run.
    #[error("{0}")]
    Unavailable(String),

    #[error("Language detection failed: {0}")]
    DetectionFailed(String),

    #[error("Translation not supported for this language pair.")]
    UnsupportedPair {
        source_language: String,
        target_language: String,
    },

    #[error("Cannot translate to the same language")]
    SameLanguage,

    #[error("Could not determine source language")]
    MissingSource,

    #[error("{0}")]
    TranslationFailed(String),

    #[error("{0}")]
    SummarizationFailed(String),
}

impl CapabilityError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}
