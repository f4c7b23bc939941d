pub mod app_config;
pub mod backend;
pub mod store;

pub use backend::{JsonFileBackend, MemoryBackend, StorageBackend};
pub use store::{collections, EntityStore, SharedStore};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt stored data: {0}")]
    Serialization(#[from] serde_json::Error),
}
