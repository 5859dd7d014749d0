//! Metadata store doubles.

use async_trait::async_trait;
use batchgram_core::{MetadataBackend, StoredMetadata};
use batchgram_storage::{
    InMemoryMetadataStore, MetadataStore, StorageError, StorageResult, StoredRecord,
};

/// In-memory store that refuses writes for keys containing `fail_marker`.
#[derive(Clone)]
pub struct FailingStore {
    pub inner: InMemoryMetadataStore,
    fail_marker: String,
}

impl FailingStore {
    pub fn failing_on(fail_marker: &str) -> Self {
        Self {
            inner: InMemoryMetadataStore::new(),
            fail_marker: fail_marker.to_string(),
        }
    }
}

#[async_trait]
impl MetadataStore for FailingStore {
    async fn put(
        &self,
        key: &str,
        value: Vec<u8>,
        metadata: StoredMetadata,
    ) -> StorageResult<()> {
        if key.contains(&self.fail_marker) {
            return Err(StorageError::WriteFailed(format!("refusing {}", key)));
        }
        self.inner.put(key, value, metadata).await
    }

    async fn get(&self, key: &str) -> StorageResult<Option<StoredRecord>> {
        self.inner.get(key).await
    }

    async fn health_check(&self) -> StorageResult<()> {
        Err(StorageError::ConfigError("store is degraded".to_string()))
    }

    fn backend_type(&self) -> MetadataBackend {
        MetadataBackend::Memory
    }
}
