use std::sync::Arc;

use async_trait::async_trait;
use lingua_core::capability::{
    Availability, CapabilityError, ProgressSink, TranslationSession, TranslatorFactory,
};
use lingua_core::config::LanguagesConfig;
use lingua_core::narration::get_language_name;

use crate::client::ChatCompletionClient;

/// Translation through a chat completion model.
///
/// A pair is offered when its target is one of the configured languages.
pub struct LlmTranslatorFactory {
    client: Arc<ChatCompletionClient>,
    languages: LanguagesConfig,
}

impl LlmTranslatorFactory {
    pub fn new(client: Arc<ChatCompletionClient>, languages: LanguagesConfig) -> Self {
        Self { client, languages }
    }
}

#[async_trait]
impl TranslatorFactory for LlmTranslatorFactory {
    async fn availability(&self, source: &str, target: &str) -> Availability {
        if !source.is_empty() && self.languages.contains(target) {
            Availability::Readily
        } else {
            Availability::No
        }
    }

    async fn create(
        &self,
        source: &str,
        target: &str,
        _progress: Arc<dyn ProgressSink>,
    ) -> Result<Box<dyn TranslationSession>, CapabilityError> {
        Ok(Box::new(LlmTranslationSession {
            client: self.client.clone(),
            prompt: translation_prompt(source, target),
        }))
    }
}

struct LlmTranslationSession {
    client: Arc<ChatCompletionClient>,
    prompt: String,
}

#[async_trait]
impl TranslationSession for LlmTranslationSession {
    async fn translate(&self, text: &str) -> Result<String, CapabilityError> {
        self.client
            .complete(&self.prompt, text)
            .await
            .map_err(|e| e.into_capability(CapabilityError::TranslationFailed))
    }
}

fn translation_prompt(source: &str, target: &str) -> String {
    format!(
        "Translate the user's text from {} to {}. \
Reply with the translation only, without quotes or commentary.",
        get_language_name(source),
        get_language_name(target)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingua_core::config::ProviderConfig;

    fn factory() -> LlmTranslatorFactory {
        let client = ChatCompletionClient::new(&ProviderConfig::default()).unwrap();
        LlmTranslatorFactory::new(Arc::new(client), LanguagesConfig::default())
    }

    #[tokio::test]
    async fn test_availability_follows_configured_targets() {
        let factory = factory();
        assert_eq!(factory.availability("fr", "en").await, Availability::Readily);
        assert_eq!(factory.availability("de", "es").await, Availability::Readily);
        assert_eq!(factory.availability("fr", "ja").await, Availability::No);
        assert_eq!(factory.availability("", "en").await, Availability::No);
    }

    #[test]
    fn test_prompt_names_both_languages() {
        let prompt = translation_prompt("fr", "pt");
        assert!(prompt.contains("from French to Portuguese"));
    }
}
