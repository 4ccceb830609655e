//! Configuration service implementation.
//!
//! Loads `LinguaConfig` from `config.toml` and applies environment overrides
//! for the provider section.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use lingua_core::config::{LinguaConfig, ProviderConfig};
use lingua_core::error::Result;

use crate::paths::LinguaPaths;

pub const ENV_API_KEY: &str = "LINGUA_API_KEY";
pub const ENV_BASE_URL: &str = "LINGUA_BASE_URL";
pub const ENV_MODEL: &str = "LINGUA_MODEL";

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<LinguaConfig>>>,
}

impl ConfigService {
    /// Uses the default `~/.config/lingua/config.toml`.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(LinguaPaths::config_file()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// A missing file yields the defaults. A file that fails to parse is an
    /// error so a typo never silently resets the user's settings.
    pub fn get_config(&self) -> Result<LinguaConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = Self::load_from(&self.path)?;
        apply_env_overrides(&mut loaded.provider, |key| std::env::var(key).ok());

        {
            let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    fn load_from(path: &Path) -> Result<LinguaConfig> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(LinguaConfig::default());
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(LinguaConfig::default());
        }

        Ok(toml::from_str(&content)?)
    }
}

/// Environment variables take precedence over the file for provider access.
fn apply_env_overrides<F>(provider: &mut ProviderConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(ENV_API_KEY) {
        provider.api_key = Some(key);
    }
    if let Some(url) = lookup(ENV_BASE_URL) {
        provider.base_url = url;
    }
    if let Some(model) = lookup(ENV_MODEL) {
        provider.model = model;
    }
}
