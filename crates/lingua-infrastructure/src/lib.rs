pub mod config_service;
pub mod history_repository;
pub mod paths;
pub mod preference_repository;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::history_repository::SlotHistoryRepository;
pub use crate::paths::LinguaPaths;
pub use crate::preference_repository::SlotPreferenceRepository;
pub use crate::storage::{FileKeyValueStore, MemoryKeyValueStore};
