//! Metadata lookup for recorded files.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use batchgram_core::{AppError, StoredMetadata};
use std::sync::Arc;

/// Get the metadata recorded for a file key
#[utoipa::path(
    get,
    path = "/api/metadata/{key}",
    tag = "files",
    params(("key" = String, Path, description = "File key `{id}.{extension}`")),
    responses(
        (status = 200, description = "Recorded metadata", body = StoredMetadata),
        (status = 400, description = "Invalid key", body = ErrorResponse),
        (status = 404, description = "No record for key", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "get_metadata"))]
pub async fn get_metadata(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<StoredMetadata>, HttpAppError> {
    let store = state
        .metadata_store
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Metadata recording is disabled".to_string()))?;

    let metadata = store
        .get_metadata(&key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No metadata for {}", key)))?;

    Ok(Json(metadata))
}
