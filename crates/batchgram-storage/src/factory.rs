#[cfg(feature = "storage-local")]
use crate::LocalMetadataStore;
#[cfg(feature = "storage-memory")]
use crate::InMemoryMetadataStore;
use crate::{MetadataBackend, MetadataStore, StorageError, StorageResult};
use batchgram_core::Config;
use std::sync::Arc;

/// Create the metadata store selected by configuration.
///
/// Returns `Ok(None)` when metadata recording is disabled; uploads are still
/// relayed in that case, nothing is persisted.
pub async fn create_metadata_store(
    config: &Config,
) -> StorageResult<Option<Arc<dyn MetadataStore>>> {
    match config.metadata_backend() {
        #[cfg(feature = "storage-memory")]
        MetadataBackend::Memory => Ok(Some(Arc::new(InMemoryMetadataStore::new()))),

        #[cfg(not(feature = "storage-memory"))]
        MetadataBackend::Memory => Err(StorageError::ConfigError(
            "In-memory metadata backend not available (storage-memory feature not enabled)"
                .to_string(),
        )),

        #[cfg(feature = "storage-local")]
        MetadataBackend::Local => {
            let base_path = config.metadata_local_path().ok_or_else(|| {
                StorageError::ConfigError("METADATA_LOCAL_PATH not configured".to_string())
            })?;

            let store = LocalMetadataStore::new(base_path).await?;
            Ok(Some(Arc::new(store)))
        }

        #[cfg(not(feature = "storage-local"))]
        MetadataBackend::Local => Err(StorageError::ConfigError(
            "Local metadata backend not available (storage-local feature not enabled)".to_string(),
        )),

        MetadataBackend::None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use batchgram_core::config::RelayConfig;

    fn config_with(backend: MetadataBackend, path: Option<String>) -> Config {
        let mut relay = RelayConfig::with_credentials("-100123", "123:abc");
        relay.metadata_backend = backend;
        relay.metadata_local_path = path;
        Config::new(relay)
    }

    #[tokio::test]
    async fn test_memory_backend() {
        let store = create_metadata_store(&config_with(MetadataBackend::Memory, None))
            .await
            .unwrap()
            .expect("store");
        assert_eq!(store.backend_type(), MetadataBackend::Memory);
    }

    #[tokio::test]
    async fn test_local_backend_requires_path() {
        let result = create_metadata_store(&config_with(MetadataBackend::Local, None)).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_local_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta").to_string_lossy().into_owned();
        let store = create_metadata_store(&config_with(MetadataBackend::Local, Some(path)))
            .await
            .unwrap()
            .expect("store");
        assert_eq!(store.backend_type(), MetadataBackend::Local);
        assert!(dir.path().join("meta").is_dir());
    }

    #[tokio::test]
    async fn test_disabled_backend() {
        let store = create_metadata_store(&config_with(MetadataBackend::None, None))
            .await
            .unwrap();
        assert!(store.is_none());
    }
}
