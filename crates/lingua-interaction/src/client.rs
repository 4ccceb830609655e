//! Minimal client for OpenAI-compatible Chat Completions endpoints.
//!
//! Works against OpenAI itself as well as local servers exposing the same API
//! (Ollama, llama.cpp, vLLM). The base URL and model come from `[provider]`.

use std::time::Duration;

use lingua_core::capability::CapabilityError;
use lingua_core::config::ProviderConfig;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The endpoint could not be reached.
    #[error("Provider unreachable: {0}")]
    Unreachable(String),

    /// The endpoint answered with a non-success status.
    #[error("Provider returned {status}: {message}{}", retry_hint(.is_retryable))]
    Http {
        status: u16,
        message: String,
        is_retryable: bool,
    },

    /// The response could not be understood.
    #[error("Unexpected provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Connection failures become `Unavailable`; everything else goes through `failed`.
    pub(crate) fn into_capability(self, failed: fn(String) -> CapabilityError) -> CapabilityError {
        match self {
            Self::Unreachable(message) => CapabilityError::Unavailable(message),
            other => failed(other.to_string()),
        }
    }
}

fn retry_hint(is_retryable: &bool) -> &'static str {
    if *is_retryable {
        " (temporary, try again later)"
    } else {
        ""
    }
}

#[derive(Clone)]
pub struct ChatCompletionClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl ChatCompletionClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Unreachable(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: completions_endpoint(&config.base_url),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one system + user exchange and returns the reply text.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, ProviderError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.0,
        };

        let mut request = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        tracing::debug!("[ChatCompletionClient] POST {} ({})", self.endpoint, self.model);
        let response = request
            .send()
            .await
            .map_err(|err| ProviderError::Unreachable(format!("Request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| ProviderError::InvalidResponse(format!("Failed to parse response: {err}")))?;

        extract_text_response(parsed)
    }
}

fn completions_endpoint(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with("/chat/completions") {
        base.to_string()
    } else {
        format!("{base}/chat/completions")
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String, ProviderError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| ProviderError::InvalidResponse("no content in the response".into()))
}

fn map_http_error(status: StatusCode, body: &str) -> ProviderError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    ProviderError::Http {
        status: status.as_u16(),
        message,
        is_retryable,
    }
}
