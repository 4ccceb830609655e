//! Unified path management for lingua files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/lingua/            # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/lingua/       # Data directory
//! └── slots/                   # Key-value slots
//!     ├── chatHistory.json
//!     └── darkMode.json
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for lingua_core::LinguaError {
    fn from(e: PathError) -> Self {
        lingua_core::LinguaError::config(e.to_string())
    }
}

const APP_DIR: &str = "lingua";

pub struct LinguaPaths;

impl LinguaPaths {
    /// Returns the lingua configuration directory (e.g. `~/.config/lingua/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the lingua data directory (e.g. `~/.local/share/lingua/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the directory holding the key-value slots.
    pub fn slots_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("slots"))
    }
}
