//! Capability providers backed by an OpenAI-compatible HTTP API.
//!
//! `OpenAiCompatProvider` bundles a detector, a translator factory and a
//! summarizer factory that share one HTTP client.

pub mod client;
pub mod detector;
pub mod summarizer;
pub mod translator;

use std::sync::Arc;

use lingua_core::capability::Capabilities;
use lingua_core::config::LinguaConfig;

pub use client::{ChatCompletionClient, ProviderError};
pub use detector::LlmLanguageDetector;
pub use summarizer::LlmSummarizerFactory;
pub use translator::LlmTranslatorFactory;

pub struct OpenAiCompatProvider {
    detector: Arc<LlmLanguageDetector>,
    translator: Arc<LlmTranslatorFactory>,
    summarizer: Arc<LlmSummarizerFactory>,
}

impl OpenAiCompatProvider {
    pub fn from_config(config: &LinguaConfig) -> Result<Self, ProviderError> {
        let client = Arc::new(ChatCompletionClient::new(&config.provider)?);
        tracing::info!(
            "Using model {} at {}",
            client.model(),
            config.provider.base_url
        );

        Ok(Self {
            detector: Arc::new(LlmLanguageDetector::new(client.clone())),
            translator: Arc::new(LlmTranslatorFactory::new(
                client.clone(),
                config.languages.clone(),
            )),
            summarizer: Arc::new(LlmSummarizerFactory::new(client)),
        })
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::new(
            self.detector.clone(),
            self.translator.clone(),
            self.summarizer.clone(),
        )
    }
}
