use std::sync::Arc;

use async_trait::async_trait;
use lingua_core::capability::{
    Availability, CapabilityError, ProgressSink, SummarizationSession, SummarizerFactory,
    SummarizerOptions, SummaryFormat, SummaryLength, SummaryStyle,
};

use crate::client::ChatCompletionClient;

/// Summaries through a chat completion model.
pub struct LlmSummarizerFactory {
    client: Arc<ChatCompletionClient>,
}

impl LlmSummarizerFactory {
    pub fn new(client: Arc<ChatCompletionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SummarizerFactory for LlmSummarizerFactory {
    async fn availability(&self) -> Availability {
        Availability::Readily
    }

    async fn create(
        &self,
        options: &SummarizerOptions,
        _progress: Arc<dyn ProgressSink>,
    ) -> Result<Box<dyn SummarizationSession>, CapabilityError> {
        Ok(Box::new(LlmSummarizationSession {
            client: self.client.clone(),
            prompt: summary_prompt(options),
        }))
    }
}

struct LlmSummarizationSession {
    client: Arc<ChatCompletionClient>,
    prompt: String,
}

#[async_trait]
impl SummarizationSession for LlmSummarizationSession {
    async fn summarize(
        &self,
        text: &str,
        context: Option<&str>,
    ) -> Result<String, CapabilityError> {
        let prompt = match context {
            Some(context) => format!("{}\nAdditional context: {}", self.prompt, context),
            None => self.prompt.clone(),
        };

        self.client
            .complete(&prompt, text)
            .await
            .map_err(|e| e.into_capability(CapabilityError::SummarizationFailed))
    }
}

fn summary_prompt(options: &SummarizerOptions) -> String {
    let shape = match (options.style, options.length) {
        (SummaryStyle::KeyPoints, SummaryLength::Short) => "3 key points",
        (SummaryStyle::KeyPoints, SummaryLength::Medium) => "5 key points",
        (SummaryStyle::KeyPoints, SummaryLength::Long) => "7 key points",
        (SummaryStyle::Tldr, SummaryLength::Short) => "a one-sentence TL;DR",
        (SummaryStyle::Tldr, SummaryLength::Medium) => "a three-sentence TL;DR",
        (SummaryStyle::Tldr, SummaryLength::Long) => "a five-sentence TL;DR",
        (SummaryStyle::Teaser, SummaryLength::Short) => "a one-sentence teaser",
        (SummaryStyle::Teaser, _) => "a short teaser paragraph",
        (SummaryStyle::Headline, SummaryLength::Short) => "a headline of at most 12 words",
        (SummaryStyle::Headline, _) => "a headline of at most 22 words",
    };
    let format = match options.format {
        SummaryFormat::PlainText => "Use plain text without any markup.",
        SummaryFormat::Markdown => "Use Markdown.",
    };

    format!(
        "{}. Summarize the user's text as {}. {} Reply with the summary only.",
        options.shared_context, shape, format
    )
}
