//! Capability interfaces consumed by the orchestrators.
//!
//! Detection, translation and summarization are provided by external services.
//! The core only sees these traits. Translation and summarization use a
//! two-phase contract: create a session (which may need a `ready()` wait while
//! resources download), then invoke it.

mod detector;
mod error;
mod progress;
mod summarizer;
mod translator;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use detector::{Detection, LanguageDetector};
pub use error::CapabilityError;
pub use progress::{ProgressSink, TracingProgress};
pub use summarizer::{
    SummarizationSession, SummarizerFactory, SummarizerOptions, SummaryFormat, SummaryLength,
    SummaryStyle, create_summarization_session,
};
pub use translator::{TranslationSession, TranslatorFactory, create_translation_session};

/// Whether a provider (or a language pair) can be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    /// Usable immediately.
    Readily,
    /// Usable once resources are downloaded; sessions need `ready()`.
    AfterDownload,
    /// Not usable.
    No,
}

impl Availability {
    pub fn is_usable(self) -> bool {
        !matches!(self, Self::No)
    }

    pub fn needs_download(self) -> bool {
        matches!(self, Self::AfterDownload)
    }
}

/// The providers present in the host. `None` means absent.
#[derive(Clone, Default)]
pub struct Capabilities {
    pub detector: Option<Arc<dyn LanguageDetector>>,
    pub translator: Option<Arc<dyn TranslatorFactory>>,
    pub summarizer: Option<Arc<dyn SummarizerFactory>>,
}

impl Capabilities {
    pub fn new(
        detector: Arc<dyn LanguageDetector>,
        translator: Arc<dyn TranslatorFactory>,
        summarizer: Arc<dyn SummarizerFactory>,
    ) -> Self {
        Self {
            detector: Some(detector),
            translator: Some(translator),
            summarizer: Some(summarizer),
        }
    }
}
