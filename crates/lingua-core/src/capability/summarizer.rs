use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Availability, CapabilityError, ProgressSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryStyle {
    #[default]
    KeyPoints,
    Tldr,
    Teaser,
    Headline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryFormat {
    #[default]
    PlainText,
    Markdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

/// Options a summarizer session is created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerOptions {
    pub shared_context: String,
    pub style: SummaryStyle,
    pub format: SummaryFormat,
    pub length: SummaryLength,
}

impl Default for SummarizerOptions {
    fn default() -> Self {
        Self {
            shared_context: "This is a user message".to_string(),
            style: SummaryStyle::default(),
            format: SummaryFormat::default(),
            length: SummaryLength::default(),
        }
    }
}

#[async_trait]
pub trait SummarizationSession: Send + Sync {
    async fn ready(&self) -> Result<(), CapabilityError> {
        Ok(())
    }

    /// Summarizes `text`. `context` adds per-call context on top of the
    /// session's shared context.
    async fn summarize(&self, text: &str, context: Option<&str>)
    -> Result<String, CapabilityError>;
}

#[async_trait]
pub trait SummarizerFactory: Send + Sync {
    async fn availability(&self) -> Availability;

    async fn create(
        &self,
        options: &SummarizerOptions,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<Box<dyn SummarizationSession>, CapabilityError>;
}

/// Probes availability, creates a session and waits for it to be ready.
pub async fn create_summarization_session(
    factory: &dyn SummarizerFactory,
    options: &SummarizerOptions,
    progress: Arc<dyn ProgressSink>,
) -> Result<Box<dyn SummarizationSession>, CapabilityError> {
    let availability = factory.availability().await;
    if !availability.is_usable() {
        return Err(CapabilityError::unavailable("Summarizer API is not usable."));
    }

    let session = factory.create(options, progress).await?;
    if availability.needs_download() {
        tracing::info!("Waiting for summarizer model download");
        session.ready().await?;
    }

    Ok(session)
}
