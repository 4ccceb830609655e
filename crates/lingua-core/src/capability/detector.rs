use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Availability, CapabilityError};

/// The best guess a detector returns for a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// BCP-47 language tag, e.g. `"fr"`.
    pub language: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

impl Detection {
    pub fn new(language: impl Into<String>, confidence: f64) -> Self {
        Self {
            language: language.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Language detection capability.
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// Reports whether detection can run right now.
    async fn availability(&self) -> Availability {
        Availability::Readily
    }

    /// Detects the language of `text`, returning the top candidate.
    async fn detect(&self, text: &str) -> Result<Detection, CapabilityError>;
}
