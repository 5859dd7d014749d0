//! Metadata store abstraction trait
//!
//! This module defines the MetadataStore trait that all backends must implement.

use async_trait::async_trait;
use batchgram_core::{MetadataBackend, StoredMetadata};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A value together with the metadata it was written with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub value: Vec<u8>,
    pub metadata: StoredMetadata,
}

/// Key-value store for per-file metadata records
///
/// The relay only ever writes a record once per key and reads it back for
/// lookups; records are never mutated by this service. Writing an existing key
/// replaces the previous record.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Write `value` and `metadata` under `key`.
    async fn put(&self, key: &str, value: Vec<u8>, metadata: StoredMetadata)
        -> StorageResult<()>;

    /// Read the record stored under `key`, if any.
    async fn get(&self, key: &str) -> StorageResult<Option<StoredRecord>>;

    /// Read only the metadata stored under `key`, if any.
    async fn get_metadata(&self, key: &str) -> StorageResult<Option<StoredMetadata>> {
        Ok(self.get(key).await?.map(|record| record.metadata))
    }

    /// Check if a record exists
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Verify the backend is usable (directory writable, etc.).
    async fn health_check(&self) -> StorageResult<()>;

    /// Get the backend type
    fn backend_type(&self) -> MetadataBackend;
}
