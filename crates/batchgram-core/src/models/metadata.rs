use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::{DEFAULT_LABEL, DEFAULT_LIST_TYPE, FILE_ROUTE_PREFIX};
use crate::models::BatchId;

/// Metadata attached to each stored file record.
///
/// Field names follow the key-value layout the file browser already reads,
/// so they are serialized exactly as `TimeStamp`, `ListType`, `Label`, `liked`,
/// `fileName`, `fileSize` and `batchId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StoredMetadata {
    /// Unix time in milliseconds at which the record was written.
    #[serde(rename = "TimeStamp")]
    pub timestamp: i64,
    #[serde(rename = "ListType")]
    pub list_type: String,
    #[serde(rename = "Label")]
    pub label: String,
    pub liked: bool,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "fileSize")]
    pub file_size: u64,
    #[serde(rename = "batchId", default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
}

impl StoredMetadata {
    /// Metadata for a file that was just relayed as part of `batch_id`.
    pub fn for_upload(file_name: impl Into<String>, file_size: u64, batch_id: &BatchId) -> Self {
        Self {
            timestamp: Utc::now().timestamp_millis(),
            list_type: DEFAULT_LIST_TYPE.to_string(),
            label: DEFAULT_LABEL.to_string(),
            liked: false,
            file_name: file_name.into(),
            file_size,
            batch_id: Some(batch_id.to_string()),
        }
    }
}

/// One successfully relayed file, keyed by `<external_file_id>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResultRecord {
    pub external_file_id: String,
    pub extension: String,
    pub file_name: String,
    pub file_size: u64,
}

impl UploadResultRecord {
    /// Storage key of the record.
    pub fn key(&self) -> String {
        format!("{}.{}", self.external_file_id, self.extension)
    }

    /// Public path under which the file is served.
    pub fn path(&self) -> String {
        format!("{}/{}", FILE_ROUTE_PREFIX, self.key())
    }
}

/// Per-file entry of the batch upload response, in original file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BatchUploadItem {
    /// `/file/{id}.{extension}`, or null when the relay returned no identifier.
    pub src: Option<String>,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "fileSize")]
    pub file_size: u64,
    /// Set when the file was relayed but its metadata could not be recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchUploadItem {
    pub fn relayed(record: &UploadResultRecord) -> Self {
        Self {
            src: Some(record.path()),
            file_name: record.file_name.clone(),
            file_size: record.file_size,
            error: None,
        }
    }

    /// Entry for a file the relay accepted without returning an identifier.
    pub fn missing_id(file_name: impl Into<String>, file_size: u64) -> Self {
        Self {
            src: None,
            file_name: file_name.into(),
            file_size,
            error: Some("Telegram returned no file identifier for this file".to_string()),
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_metadata_wire_names() {
        let batch_id = BatchId::from("batch_1_abc".to_string());
        let meta = StoredMetadata::for_upload("cat.png", 1024, &batch_id);
        let json = serde_json::to_value(&meta).expect("serialize");

        assert!(json.get("TimeStamp").and_then(|v| v.as_i64()).is_some());
        assert_eq!(json["ListType"], "None");
        assert_eq!(json["Label"], "None");
        assert_eq!(json["liked"], false);
        assert_eq!(json["fileName"], "cat.png");
        assert_eq!(json["fileSize"], 1024);
        assert_eq!(json["batchId"], "batch_1_abc");
    }

    #[test]
    fn test_upload_result_record_key_and_path() {
        let record = UploadResultRecord {
            external_file_id: "AgACAgQ".to_string(),
            extension: "jpg".to_string(),
            file_name: "a.jpg".to_string(),
            file_size: 10,
        };
        assert_eq!(record.key(), "AgACAgQ.jpg");
        assert_eq!(record.path(), "/file/AgACAgQ.jpg");
    }

    #[test]
    fn test_batch_upload_item_omits_absent_error() {
        let item = BatchUploadItem {
            src: Some("/file/x.jpg".to_string()),
            file_name: "x.jpg".to_string(),
            file_size: 3,
            error: None,
        };
        let json = serde_json::to_value(&item).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"src": "/file/x.jpg", "fileName": "x.jpg", "fileSize": 3})
        );
    }
}
