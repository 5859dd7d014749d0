use crate::keys::validate_key;
use crate::traits::{MetadataStore, StorageError, StorageResult, StoredRecord};
use crate::MetadataBackend;
use async_trait::async_trait;
use batchgram_core::StoredMetadata;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

const RECORD_SUFFIX: &str = "json";

/// Local filesystem metadata store
///
/// Each record is one JSON file `{base_path}/{key}.json` holding the value and
/// its metadata. Writes go to a temporary file first and are renamed into place,
/// so readers never observe a half-written record.
#[derive(Clone)]
pub struct LocalMetadataStore {
    base_path: PathBuf,
}

impl LocalMetadataStore {
    /// Create a new LocalMetadataStore instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for record files (e.g., "/var/lib/batchgram/metadata")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create metadata directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalMetadataStore { base_path })
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    /// Convert a storage key to its record path. Keys are validated first so
    /// the path always stays directly under the base directory.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(format!("{}.{}", key, RECORD_SUFFIX)))
    }
}

#[async_trait]
impl MetadataStore for LocalMetadataStore {
    async fn put(
        &self,
        key: &str,
        value: Vec<u8>,
        metadata: StoredMetadata,
    ) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        let tmp_path = path.with_extension(format!("{}.tmp", RECORD_SUFFIX));
        let body = serde_json::to_vec(&StoredRecord { value, metadata })?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&tmp_path).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to create file {}: {}",
                tmp_path.display(),
                e
            ))
        })?;

        file.write_all(&body).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", tmp_path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", tmp_path.display(), e))
        })?;

        fs::rename(&tmp_path, &path).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to move record into place {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::debug!(
            path = %path.display(),
            key = %key,
            size_bytes = body.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local metadata record written"
        );

        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<Option<StoredRecord>> {
        let path = self.key_to_path(key)?;

        let body = match fs::read(&path).await {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "Failed to read file {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let record: StoredRecord = serde_json::from_slice(&body)?;
        Ok(Some(record))
    }

    async fn health_check(&self) -> StorageResult<()> {
        let metadata = fs::metadata(&self.base_path).await?;
        if !metadata.is_dir() {
            return Err(StorageError::ConfigError(format!(
                "{} is not a directory",
                self.base_path.display()
            )));
        }
        if metadata.permissions().readonly() {
            return Err(StorageError::ConfigError(format!(
                "{} is read-only",
                self.base_path.display()
            )));
        }
        Ok(())
    }

    fn backend_type(&self) -> MetadataBackend {
        MetadataBackend::Local
    }
}
