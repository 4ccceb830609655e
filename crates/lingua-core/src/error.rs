//! Error types for the Lingua application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons an orchestrator operation is rejected before touching the message store.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreconditionFailure {
    /// No message matches the requested id.
    #[error("Message not found: {0}")]
    MessageNotFound(u64),

    /// The message has not been through language detection.
    #[error("Source language unknown for message {0}")]
    MissingSourceLanguage(u64),

    /// The message carries no text to translate.
    #[error("Source text unknown for message {0}")]
    MissingOriginalText(u64),

    /// No target language was selected.
    #[error("Please select a target language first")]
    TargetLanguageUnset,

    /// The message already has a successful translation into this language.
    #[error("Already translated to {0}")]
    AlreadyTranslated(String),

    /// Target language equals the detected source language.
    #[error("Cannot translate to the same language ({0})")]
    SameLanguage(String),
}

/// A shared error type for the entire Lingua application.
///
/// The first three variants are the user-facing taxonomy; the remaining ones
/// come from the storage and configuration layers.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum LinguaError {
    /// A required provider is absent. Fatal to the feature, shown as a banner.
    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// Bad or missing input to an orchestrator operation. Nothing was mutated.
    #[error("{0}")]
    PreconditionFailed(PreconditionFailure),

    /// The provider call itself was rejected.
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LinguaError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a CapabilityUnavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::CapabilityUnavailable(message.into())
    }

    /// Creates an OperationFailed error
    pub fn operation(message: impl Into<String>) -> Self {
        Self::OperationFailed(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a precondition failure
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::PreconditionFailed(_))
    }

    /// Check if a required capability is missing
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::CapabilityUnavailable(_))
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<PreconditionFailure> for LinguaError {
    fn from(reason: PreconditionFailure) -> Self {
        Self::PreconditionFailed(reason)
    }
}

impl From<std::io::Error> for LinguaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for LinguaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for LinguaError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for LinguaError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (used at binary boundaries)
impl From<anyhow::Error> for LinguaError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, LinguaError>`.
pub type Result<T> = std::result::Result<T, LinguaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_message_is_user_facing() {
        let err: LinguaError = PreconditionFailure::TargetLanguageUnset.into();
        assert!(err.is_precondition());
        assert_eq!(err.to_string(), "Please select a target language first");
    }

    #[test]
    fn test_json_error_maps_to_serialization() {
        let parse = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let err: LinguaError = parse.into();
        assert!(err.is_serialization());
        assert!(err.to_string().starts_with("Serialization error: JSON"));
    }
}
