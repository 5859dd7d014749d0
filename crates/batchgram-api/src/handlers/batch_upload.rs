use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use batchgram_core::{
    create_batch_id, validate_batch, AppError, BatchId, BatchUploadItem, FileDescriptor,
    StoredMetadata, UploadResultRecord,
};
use batchgram_infra::with_retry_if;
use batchgram_storage::MetadataStore;
use batchgram_telegram::{MessageMedia, UploadError};
use futures::future::join_all;

use crate::constants::FILES_FIELD;
use crate::error::{batch_error_response, ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::extract_multipart_files;

const RECORD_FAILED_MESSAGE: &str = "Failed to record file metadata";

/// Batch upload handler
///
/// Validates the submitted files, relays them to Telegram as one media group and
/// records a metadata entry per relayed file.
///
/// # Returns
/// One entry per submitted file, in submission order (HTTP 200). An entry carries
/// `error` when its file was relayed but could not be recorded, or when Telegram
/// returned no identifier for it.
///
/// # Errors
/// - `AppError::InvalidInput` - No files, or the batch breaks the count/type rules
/// - `AppError::PayloadTooLarge` - A file exceeds the size limit
/// - `AppError::Upstream` - Telegram rejected the media group
/// - `AppError::UpstreamUnavailable` - Telegram could not be reached or timed out
///
/// With `LEGACY_ERROR_STATUS` every failure is reported as 500.
#[utoipa::path(
    post,
    path = "/batch-upload",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Files relayed", body = [BatchUploadItem]),
        (status = 400, description = "Invalid batch", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 502, description = "Telegram rejected or unreachable", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "batch_upload"))]
pub async fn batch_upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let result = match multipart {
        Ok(multipart) => relay_batch(&state, multipart).await,
        Err(rejection) => Err(AppError::InvalidInput(rejection.body_text()).into()),
    };

    match result {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(err) => batch_error_response(err, state.config.legacy_error_status()),
    }
}

async fn relay_batch(
    state: &AppState,
    multipart: Multipart,
) -> Result<Vec<BatchUploadItem>, HttpAppError> {
    let files = extract_multipart_files(multipart, FILES_FIELD).await?;
    if files.is_empty() {
        return Err(AppError::InvalidInput("No files uploaded".to_string()).into());
    }

    let category = validate_batch(&files, &state.config.batch_rules())?;
    let batch_id = create_batch_id();

    tracing::info!(
        batch_id = %batch_id,
        file_count = files.len(),
        category = %category,
        "Batch validated"
    );

    let start = Instant::now();
    let messages = with_retry_if(
        &state.retry_policy,
        state.sleeper.as_ref(),
        || state.telegram.send_media_group(&files, &batch_id),
        UploadError::is_retryable,
    )
    .await?;

    tracing::info!(
        batch_id = %batch_id,
        message_count = messages.len(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Batch relayed"
    );

    let store = state.metadata_store.as_deref();
    let items = join_all(
        files
            .iter()
            .enumerate()
            .map(|(index, file)| record_file(store, file, messages.get(index), &batch_id)),
    )
    .await;

    Ok(items)
}

/// Build the response entry for one relayed file, writing its metadata record
/// when a store is configured.
async fn record_file(
    store: Option<&dyn MetadataStore>,
    file: &FileDescriptor,
    message: Option<&MessageMedia>,
    batch_id: &BatchId,
) -> BatchUploadItem {
    let file_size = file.size as u64;

    let Some(file_id) = message.and_then(MessageMedia::file_id) else {
        tracing::warn!(
            batch_id = %batch_id,
            file_name = %file.name,
            "Relay result carries no file identifier"
        );
        return BatchUploadItem::missing_id(&file.name, file_size);
    };

    let record = UploadResultRecord {
        external_file_id: file_id.to_string(),
        extension: file.extension(),
        file_name: file.name.clone(),
        file_size,
    };
    let item = BatchUploadItem::relayed(&record);

    let Some(store) = store else {
        return item;
    };

    let key = record.key();
    let metadata = StoredMetadata::for_upload(&file.name, file_size, batch_id);
    match store.put(&key, Vec::new(), metadata).await {
        Ok(()) => {
            tracing::debug!(key = %key, batch_id = %batch_id, "File metadata recorded");
            item
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                key = %key,
                batch_id = %batch_id,
                "Failed to record file metadata"
            );
            item.with_error(RECORD_FAILED_MESSAGE)
        }
    }
}
