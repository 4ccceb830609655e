//! User preference repository trait.

use async_trait::async_trait;

use crate::error::Result;

/// Persisted presentation preferences.
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    /// Returns the dark-mode flag, `false` when never set.
    async fn dark_mode(&self) -> Result<bool>;

    async fn set_dark_mode(&self, enabled: bool) -> Result<()>;
}
