use crate::keys::validate_key;
use crate::traits::{MetadataStore, StorageResult, StoredRecord};
use crate::MetadataBackend;
use async_trait::async_trait;
use batchgram_core::StoredMetadata;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-process metadata store. Records are lost when the process exits.
#[derive(Clone, Default)]
pub struct InMemoryMetadataStore {
    records: Arc<RwLock<HashMap<String, StoredRecord>>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// All stored keys, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.records.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn put(
        &self,
        key: &str,
        value: Vec<u8>,
        metadata: StoredMetadata,
    ) -> StorageResult<()> {
        validate_key(key)?;

        let mut records = self.records.write().await;
        records.insert(key.to_string(), StoredRecord { value, metadata });

        tracing::debug!(key = %key, "In-memory metadata record written");
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<Option<StoredRecord>> {
        validate_key(key)?;
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }

    fn backend_type(&self) -> MetadataBackend {
        MetadataBackend::Memory
    }
}
