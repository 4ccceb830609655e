//! Application configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer. Every section is
//! optional; missing values fall back to the defaults below.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::capability::SummarizerOptions;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct LinguaConfig {
    pub timing: TimingConfig,
    pub summarizer: SummarizerOptions,
    pub provider: ProviderConfig,
    pub languages: LanguagesConfig,
}

/// Artificial delays that smooth perceived latency.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    /// Pause between showing "Analyzing..." and the detection result.
    pub detection_delay_ms: u64,
    /// Pause after a translation completes, before it is shown.
    pub translation_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            detection_delay_ms: 300,
            translation_delay_ms: 1000,
        }
    }
}

impl TimingConfig {
    /// No delays at all. Handy for tests and scripted runs.
    pub fn immediate() -> Self {
        Self {
            detection_delay_ms: 0,
            translation_delay_ms: 0,
        }
    }

    pub fn detection_delay(&self) -> Duration {
        Duration::from_millis(self.detection_delay_ms)
    }

    pub fn translation_delay(&self) -> Duration {
        Duration::from_millis(self.translation_delay_ms)
    }
}

/// Settings for the HTTP capability provider.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            model: "llama3.2".to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

/// A selectable translation target.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TargetLanguage {
    pub code: String,
    pub name: String,
}

impl TargetLanguage {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LanguagesConfig {
    pub targets: Vec<TargetLanguage>,
}

impl Default for LanguagesConfig {
    fn default() -> Self {
        Self {
            targets: vec![
                TargetLanguage::new("en", "English"),
                TargetLanguage::new("pt", "Portuguese"),
                TargetLanguage::new("es", "Spanish"),
                TargetLanguage::new("ru", "Russian"),
                TargetLanguage::new("tr", "Turkish"),
                TargetLanguage::new("fr", "French"),
            ],
        }
    }
}

impl LanguagesConfig {
    pub fn contains(&self, code: &str) -> bool {
        self.targets.iter().any(|t| t.code == code)
    }

    /// Display name for a configured code, falling back to the code itself.
    pub fn name_of<'a>(&'a self, code: &'a str) -> &'a str {
        self.targets
            .iter()
            .find(|t| t.code == code)
            .map(|t| t.name.as_str())
            .unwrap_or(code)
    }
}
