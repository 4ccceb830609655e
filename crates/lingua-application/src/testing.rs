//! Scripted capability providers and store helpers for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lingua_core::capability::{
    Availability, CapabilityError, Detection, LanguageDetector, ProgressSink,
    SummarizationSession, SummarizerFactory, SummarizerOptions, TranslationSession,
    TranslatorFactory,
};
use lingua_core::message::HistoryRepository;
use lingua_infrastructure::{MemoryKeyValueStore, SlotHistoryRepository};
use tokio::sync::Semaphore;

use crate::message_store::MessageStore;

pub fn memory_history() -> (Arc<dyn HistoryRepository>, Arc<MemoryKeyValueStore>) {
    let slots = Arc::new(MemoryKeyValueStore::new());
    let repository: Arc<dyn HistoryRepository> =
        Arc::new(SlotHistoryRepository::new(slots.clone()));
    (repository, slots)
}

pub async fn memory_store() -> Arc<MessageStore> {
    let (repository, _) = memory_history();
    Arc::new(MessageStore::open(repository).await)
}

/// A gate that holds provider calls until the test releases them.
#[derive(Clone)]
pub struct Gate(Arc<Semaphore>);

impl Gate {
    pub fn closed() -> Self {
        Self(Arc::new(Semaphore::new(0)))
    }

    pub fn release(&self) {
        self.0.add_permits(1);
    }

    async fn pass(&self) {
        if let Ok(permit) = self.0.acquire().await {
            permit.forget();
        }
    }
}

/// Answers from a fixed table of text → language.
#[derive(Default)]
pub struct ScriptedDetector {
    answers: HashMap<String, Detection>,
    gate: Option<Gate>,
}

impl ScriptedDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, text: &str, language: &str, confidence: f64) -> Self {
        self.answers
            .insert(text.to_string(), Detection::new(language, confidence));
        self
    }

    pub fn gated(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl LanguageDetector for ScriptedDetector {
    async fn detect(&self, text: &str) -> Result<Detection, CapabilityError> {
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        self.answers
            .get(text)
            .cloned()
            .ok_or_else(|| CapabilityError::DetectionFailed(format!("no answer for {:?}", text)))
    }
}

/// Translates by tagging the text with the target language, e.g. `[es] Hola`.
///
/// Targets listed in `failing` produce a `TranslationFailed` error.
pub struct ScriptedTranslator {
    availability: Availability,
    failing: Vec<String>,
    gate: Option<Gate>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl ScriptedTranslator {
    pub fn new() -> Self {
        Self {
            availability: Availability::Readily,
            failing: Vec::new(),
            gate: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    pub fn failing(mut self, target: &str) -> Self {
        self.failing.push(target.to_string());
        self
    }

    pub fn gated(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// `(source, target)` of every session created so far.
    pub fn calls(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        self.calls.clone()
    }
}

struct ScriptedTranslationSession {
    target: String,
    fail: bool,
    gate: Option<Gate>,
}

#[async_trait]
impl TranslationSession for ScriptedTranslationSession {
    async fn translate(&self, text: &str) -> Result<String, CapabilityError> {
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        if self.fail {
            return Err(CapabilityError::TranslationFailed(
                "Translation service crashed".to_string(),
            ));
        }
        Ok(format!("[{}] {}", self.target, text))
    }
}

#[async_trait]
impl TranslatorFactory for ScriptedTranslator {
    async fn availability(&self, _source: &str, _target: &str) -> Availability {
        self.availability
    }

    async fn create(
        &self,
        source: &str,
        target: &str,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<Box<dyn TranslationSession>, CapabilityError> {
        progress.on_progress(1, 1);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((source.to_string(), target.to_string()));
        }
        Ok(Box::new(ScriptedTranslationSession {
            target: target.to_string(),
            fail: self.failing.iter().any(|t| t == target),
            gate: self.gate.clone(),
        }))
    }
}

/// Returns queued results in order; an empty queue means failure.
pub struct ScriptedSummarizer {
    availability: Availability,
    results: Arc<Mutex<VecDeque<Result<String, CapabilityError>>>>,
    gate: Option<Gate>,
}

impl ScriptedSummarizer {
    pub fn new() -> Self {
        Self {
            availability: Availability::Readily,
            results: Arc::new(Mutex::new(VecDeque::new())),
            gate: None,
        }
    }

    pub fn availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    pub fn then_ok(self, summary: &str) -> Self {
        self.push(Ok(summary.to_string()))
    }

    pub fn then_err(self, message: &str) -> Self {
        self.push(Err(CapabilityError::SummarizationFailed(message.to_string())))
    }

    pub fn gated(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }

    fn push(self, result: Result<String, CapabilityError>) -> Self {
        if let Ok(mut results) = self.results.lock() {
            results.push_back(result);
        }
        self
    }
}

struct ScriptedSummarizationSession {
    results: Arc<Mutex<VecDeque<Result<String, CapabilityError>>>>,
    gate: Option<Gate>,
}

#[async_trait]
impl SummarizationSession for ScriptedSummarizationSession {
    async fn summarize(
        &self,
        _text: &str,
        _context: Option<&str>,
    ) -> Result<String, CapabilityError> {
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        self.results
            .lock()
            .ok()
            .and_then(|mut results| results.pop_front())
            .unwrap_or_else(|| {
                Err(CapabilityError::SummarizationFailed(
                    "no scripted summary".to_string(),
                ))
            })
    }
}

#[async_trait]
impl SummarizerFactory for ScriptedSummarizer {
    async fn availability(&self) -> Availability {
        self.availability
    }

    async fn create(
        &self,
        _options: &SummarizerOptions,
        _progress: Arc<dyn ProgressSink>,
    ) -> Result<Box<dyn SummarizationSession>, CapabilityError> {
        Ok(Box::new(ScriptedSummarizationSession {
            results: self.results.clone(),
            gate: self.gate.clone(),
        }))
    }
}
