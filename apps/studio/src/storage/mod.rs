//! Durable key-value storage for the editor.
//!
//! Two keys are used: [`DOCUMENT_KEY`] holds the live document and
//! [`VERSIONS_KEY`] holds the saved version list. Values are JSON strings.

use async_trait::async_trait;
use thiserror::Error;

pub mod file;
#[cfg(test)]
pub mod memory;

pub use file::FileStore;
#[cfg(test)]
pub use memory::MemoryStore;

/// Key of the autosaved live document.
pub const DOCUMENT_KEY: &str = "cvData";
/// Key of the saved version list (newest first).
pub const VERSIONS_KEY: &str = "cvVersions";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
