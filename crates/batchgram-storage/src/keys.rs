//! Shared key handling for metadata store backends.
//!
//! Keys are built by `UploadResultRecord::key` as `{external_file_id}.{extension}`.

use crate::traits::{StorageError, StorageResult};

const MAX_KEY_LENGTH: usize = 512;

/// Reject keys that could escape a backend's namespace.
///
/// Telegram file ids are URL-safe base64 (`A-Z a-z 0-9 - _`) so valid keys never
/// need separators or parent references.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }

    if key.len() > MAX_KEY_LENGTH {
        return Err(StorageError::InvalidKey(format!(
            "Storage key exceeds {} characters",
            MAX_KEY_LENGTH
        )));
    }

    if key.contains("..") || key.contains('/') || key.contains('\\') || key.contains('\0') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }

    Ok(())
}
