use lingua_core::capability::Capabilities;

/// Banner shown while a required capability is missing.
pub const UNSUPPORTED_BANNER: &str =
    "Oops! Some language features are not supported on your browser.";

/// Which providers are present and usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityReport {
    pub detector: bool,
    pub translator: bool,
    pub summarizer: bool,
}

impl CapabilityReport {
    /// Sending needs detection and translation; summaries are per message.
    pub fn can_send(&self) -> bool {
        self.detector && self.translator
    }

    pub fn banner(&self) -> Option<&'static str> {
        (!self.can_send()).then_some(UNSUPPORTED_BANNER)
    }
}

/// Checks which providers are present and whether they report themselves usable.
pub async fn probe_capabilities(capabilities: &Capabilities) -> CapabilityReport {
    let detector = match &capabilities.detector {
        Some(detector) => detector.availability().await.is_usable(),
        None => false,
    };
    let translator = capabilities.translator.is_some();
    let summarizer = match &capabilities.summarizer {
        Some(summarizer) => summarizer.availability().await.is_usable(),
        None => false,
    };

    let report = CapabilityReport {
        detector,
        translator,
        summarizer,
    };
    if report.can_send() {
        tracing::debug!("[CapabilityProbe] {:?}", report);
    } else {
        tracing::warn!("[CapabilityProbe] Missing required capability: {:?}", report);
    }
    report
}
