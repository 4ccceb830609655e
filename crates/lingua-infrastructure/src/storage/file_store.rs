//! Directory-backed key-value slots.

use std::path::PathBuf;

use async_trait::async_trait;
use lingua_core::error::{LinguaError, Result};
use lingua_core::storage::KeyValueStore;

use super::atomic_file::AtomicFile;

/// Stores each slot as `<dir>/<key>.json`.
///
/// File operations run on the blocking pool; every write is atomic.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn slot(&self, key: &str) -> Result<AtomicFile> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(LinguaError::internal(format!("Invalid slot name: {:?}", key)));
        }
        Ok(AtomicFile::new(self.dir.join(format!("{}.json", key))))
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| LinguaError::internal(format!("Failed to join task: {}", e)))?
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let slot = self.slot(key)?;
        run_blocking(move || Ok(slot.read()?)).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let slot = self.slot(key)?;
        let value = value.to_string();
        tracing::debug!("Writing slot {} ({} bytes)", key, value.len());
        run_blocking(move || Ok(slot.write(&value)?)).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let slot = self.slot(key)?;
        tracing::debug!("Removing slot {}", key);
        run_blocking(move || Ok(slot.remove()?)).await
    }
}
