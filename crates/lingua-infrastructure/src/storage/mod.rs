//! Storage layer: atomic slot files and key-value store implementations.

mod atomic_file;
mod file_store;
mod memory_store;

pub use atomic_file::{AtomicFile, AtomicFileError};
pub use file_store::FileKeyValueStore;
pub use memory_store::MemoryKeyValueStore;
