use std::sync::Arc;

use async_trait::async_trait;

use super::{Availability, CapabilityError, ProgressSink};

/// A translator bound to one language pair.
#[async_trait]
pub trait TranslationSession: Send + Sync {
    /// Resolves once on-demand resources are in place.
    async fn ready(&self) -> Result<(), CapabilityError> {
        Ok(())
    }

    async fn translate(&self, text: &str) -> Result<String, CapabilityError>;
}

/// Creates translation sessions.
#[async_trait]
pub trait TranslatorFactory: Send + Sync {
    /// Pairwise availability of `source` → `target`.
    async fn availability(&self, source: &str, target: &str) -> Availability;

    /// Constructs a session. The session may still need `ready()` before use.
    async fn create(
        &self,
        source: &str,
        target: &str,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<Box<dyn TranslationSession>, CapabilityError>;
}

/// Validates the pair, creates a session and waits for it to be ready.
///
/// # Errors
///
/// - `MissingSource` when `source` is empty
/// - `SameLanguage` when `source == target`
/// - `UnsupportedPair` when the provider reports the pair as unavailable
/// - whatever the provider returns while creating or preparing the session
pub async fn create_translation_session(
    factory: &dyn TranslatorFactory,
    source: &str,
    target: &str,
    progress: Arc<dyn ProgressSink>,
) -> Result<Box<dyn TranslationSession>, CapabilityError> {
    if source.is_empty() {
        return Err(CapabilityError::MissingSource);
    }
    if source == target {
        return Err(CapabilityError::SameLanguage);
    }

    let availability = factory.availability(source, target).await;
    if !availability.is_usable() {
        return Err(CapabilityError::UnsupportedPair {
            source_language: source.to_string(),
            target_language: target.to_string(),
        });
    }

    let session = factory.create(source, target, progress).await?;
    if availability.needs_download() {
        tracing::info!("Downloading language pack for {} -> {}", source, target);
        session.ready().await?;
    }

    Ok(session)
}
