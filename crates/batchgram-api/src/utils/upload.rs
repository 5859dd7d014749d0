//! Multipart extraction for batch uploads

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use batchgram_core::{AppError, FileDescriptor};

const UNKNOWN_FILENAME: &str = "unknown";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Collect every part named `field` into file descriptors, in submission order.
/// Other fields are read and ignored. An empty result is left to the caller.
pub async fn extract_multipart_files(
    mut multipart: Multipart,
    field: &str,
) -> Result<Vec<FileDescriptor>, AppError> {
    let mut files = Vec::new();

    while let Some(part) = multipart.next_field().await.map_err(multipart_error)? {
        if part.name() != Some(field) {
            continue;
        }

        let filename = part
            .file_name()
            .map(|s: &str| s.to_string())
            .unwrap_or_else(|| UNKNOWN_FILENAME.to_string());
        let content_type = part
            .content_type()
            .map(|s: &str| s.to_string())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let data = part.bytes().await.map_err(multipart_error)?;

        tracing::debug!(
            filename = %filename,
            content_type = %content_type,
            size = data.len(),
            "Received batch file"
        );

        files.push(FileDescriptor::new(filename, content_type, data));
    }

    Ok(files)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Request body too large: {}", err.body_text()))
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}
