use std::sync::Arc;

use async_trait::async_trait;
use lingua_core::capability::{CapabilityError, Detection, LanguageDetector};
use serde::Deserialize;

use crate::client::ChatCompletionClient;

const DETECTION_PROMPT: &str = "You identify the language a text is written in. \
Reply with a single JSON object and nothing else: \
{\"language\": \"<BCP-47 tag, e.g. en, fr, pt-BR>\", \"confidence\": <number between 0 and 1>}.";

/// Language detection through a chat completion model.
pub struct LlmLanguageDetector {
    client: Arc<ChatCompletionClient>,
}

impl LlmLanguageDetector {
    pub fn new(client: Arc<ChatCompletionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LanguageDetector for LlmLanguageDetector {
    async fn detect(&self, text: &str) -> Result<Detection, CapabilityError> {
        let reply = self
            .client
            .complete(DETECTION_PROMPT, text)
            .await
            .map_err(|e| e.into_capability(CapabilityError::DetectionFailed))?;

        parse_detection(&reply)
    }
}

#[derive(Deserialize)]
struct DetectionReply {
    language: String,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Parses the model reply, tolerating code fences and surrounding prose.
pub(crate) fn parse_detection(reply: &str) -> Result<Detection, CapabilityError> {
    let json = llm_toolkit::extract_json(reply).map_err(|e| {
        CapabilityError::DetectionFailed(format!("no JSON object in reply: {e}"))
    })?;

    // Only the first value counts; models sometimes keep talking after it.
    let parsed: DetectionReply = serde_json::Deserializer::from_str(&json)
        .into_iter::<DetectionReply>()
        .next()
        .ok_or_else(|| CapabilityError::DetectionFailed("empty JSON in reply".into()))?
        .map_err(|e| CapabilityError::DetectionFailed(format!("malformed reply: {e}")))?;

    let language = parsed.language.trim();
    if language.is_empty() || language.eq_ignore_ascii_case("und") {
        return Err(CapabilityError::DetectionFailed(
            "language could not be determined".into(),
        ));
    }

    Ok(Detection::new(
        language.to_string(),
        parsed.confidence.unwrap_or(0.5),
    ))
}
