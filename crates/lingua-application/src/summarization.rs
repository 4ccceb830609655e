//! On-demand summaries of long English messages.

use std::sync::Arc;

use lingua_core::PreconditionFailure;
use lingua_core::capability::{
    ProgressSink, SummarizerFactory, SummarizerOptions, create_summarization_session,
};
use lingua_core::error::Result;
use lingua_core::message::{Message, MessageId, MessagePatch, summary_anchor};

use crate::message_store::MessageStore;

/// Error recorded when no summarization provider is present.
pub const SUMMARIZER_MISSING_MESSAGE: &str =
    "The Summarizer API is not supported in your current browser.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummarizeOutcome {
    Summarized { anchor: String, summary: String },
    /// `summary_error` was set; any earlier summary is kept.
    Failed { anchor: String, error: String },
}

/// Label for the summarize action of `message`.
pub fn summarize_action_label(message: &Message) -> &'static str {
    if message.is_summarizing {
        "Summarizing..."
    } else if message.summary_error.is_some() {
        "Try Again"
    } else if message.summary.is_some() {
        "Re-Summarize"
    } else {
        "Summarize"
    }
}

pub struct SummarizationOrchestrator {
    store: Arc<MessageStore>,
    summarizer: Option<Arc<dyn SummarizerFactory>>,
    options: SummarizerOptions,
    progress: Arc<dyn ProgressSink>,
}

impl SummarizationOrchestrator {
    pub fn new(
        store: Arc<MessageStore>,
        summarizer: Option<Arc<dyn SummarizerFactory>>,
        options: SummarizerOptions,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            store,
            summarizer,
            options,
            progress,
        }
    }

    pub async fn summarize(&self, id: MessageId) -> Result<SummarizeOutcome> {
        let message = self
            .store
            .find(id)
            .await
            .ok_or(PreconditionFailure::MessageNotFound(id))?;

        self.store
            .update_by_id(id, MessagePatch::new().summarizing(true).summary_error(None))
            .await?;
        tracing::debug!("[Summarization] Summarizing message {}", id);

        let anchor = summary_anchor(id);
        match self.run(&message.text).await {
            Ok(summary) => {
                self.store
                    .update_by_id(
                        id,
                        MessagePatch::new()
                            .summarizing(false)
                            .summary(summary.clone())
                            .summary_error(None),
                    )
                    .await?;
                tracing::info!("[Summarization] Message {} summarized", id);
                Ok(SummarizeOutcome::Summarized { anchor, summary })
            }
            Err(error) => {
                tracing::warn!("[Summarization] Message {} failed: {}", id, error);
                self.store
                    .update_by_id(
                        id,
                        MessagePatch::new()
                            .summarizing(false)
                            .summary_error(Some(error.clone())),
                    )
                    .await?;
                Ok(SummarizeOutcome::Failed { anchor, error })
            }
        }
    }

    async fn run(&self, text: &str) -> std::result::Result<String, String> {
        let Some(summarizer) = &self.summarizer else {
            return Err(SUMMARIZER_MISSING_MESSAGE.to_string());
        };

        let session =
            create_summarization_session(summarizer.as_ref(), &self.options, self.progress.clone())
                .await
                .map_err(|e| e.to_string())?;

        session.summarize(text, None).await.map_err(|e| e.to_string())
    }
}
