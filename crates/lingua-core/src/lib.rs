pub mod capability;
pub mod config;
pub mod error;
pub mod message;
pub mod narration;
pub mod preference;
pub mod storage;

// Re-export common error type
pub use error::{LinguaError, PreconditionFailure};
