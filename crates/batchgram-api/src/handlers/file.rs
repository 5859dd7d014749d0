//! File route: serves a relayed file by its `{id}.{ext}` key.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use batchgram_core::AppError;
use batchgram_storage::validate_key;
use batchgram_telegram::UploadError;
use std::sync::Arc;

/// Reported when Telegram cannot be reached while fetching a file.
const DOWNLOAD_ERROR_MESSAGE: &str = "Network error occurred while fetching the file";

/// Serve a relayed file. When metadata recording is enabled only recorded keys
/// are served.
#[utoipa::path(
    get,
    path = "/file/{key}",
    tag = "files",
    params(("key" = String, Path, description = "File key `{id}.{extension}` as returned by the batch upload")),
    responses(
        (status = 200, description = "File content"),
        (status = 404, description = "Unknown key", body = ErrorResponse),
        (status = 502, description = "Telegram rejected or unreachable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "get_file"))]
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Response, HttpAppError> {
    validate_key(&key)?;
    let (file_id, extension) = key
        .rsplit_once('.')
        .filter(|(id, ext)| !id.is_empty() && !ext.is_empty())
        .ok_or_else(|| AppError::NotFound(format!("File not found: {}", key)))?;

    if let Some(store) = &state.metadata_store {
        if !store.exists(&key).await? {
            return Err(AppError::NotFound(format!("File not found: {}", key)).into());
        }
    }

    let telegram_file = state.telegram.get_file(file_id).await.map_err(|e| match e {
        UploadError::Rejected { status: 400, .. } => {
            HttpAppError(AppError::NotFound(format!("File not found: {}", key)))
        }
        other => download_error(other),
    })?;

    let file_path = telegram_file
        .file_path
        .ok_or_else(|| AppError::NotFound(format!("File is no longer available: {}", key)))?;

    let download = state
        .telegram
        .download_file(&file_path, telegram_file.file_size)
        .await
        .map_err(download_error)?;

    tracing::debug!(
        key = %key,
        content_length = ?download.content_length,
        "Streaming relayed file"
    );

    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(extension))
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable");
    if let Some(length) = download.content_length {
        response = response.header(header::CONTENT_LENGTH, length);
    }

    response
        .body(Body::from_stream(download.stream))
        .map_err(|e| HttpAppError(AppError::Internal(format!("Failed to build response: {}", e))))
}

fn download_error(err: UploadError) -> HttpAppError {
    match err {
        UploadError::Unreachable(detail) | UploadError::Network(detail) => {
            HttpAppError(AppError::UpstreamUnavailable {
                message: DOWNLOAD_ERROR_MESSAGE.to_string(),
                detail,
            })
        }
        other => HttpAppError::from(other),
    }
}

fn content_type_for(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" | "ogv" => "video/ogg",
        _ => "application/octet-stream",
    }
}
