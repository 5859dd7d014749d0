//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`. Errors
//! from the core, storage and telegram crates convert with `?` and render
//! consistently (status, body, logging).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use batchgram_core::{AppError, BatchValidationError, ErrorMetadata, LogLevel};
use batchgram_storage::StorageError;
use batchgram_telegram::{UploadError, NETWORK_ERROR_MESSAGE};
use serde::Serialize;
use std::sync::OnceLock;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client (e.g., "Retry after a short delay")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from batchgram-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<BatchValidationError> for HttpAppError {
    fn from(err: BatchValidationError) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<UploadError> for HttpAppError {
    fn from(err: UploadError) -> Self {
        let app_error = match err {
            UploadError::Rejected { description, .. } => AppError::Upstream(description),
            UploadError::Unreachable(detail) | UploadError::Network(detail) => {
                AppError::UpstreamUnavailable {
                    message: NETWORK_ERROR_MESSAGE.to_string(),
                    detail,
                }
            }
            UploadError::MalformedResponse(_) => AppError::Upstream(err.to_string()),
            UploadError::InvalidRequest(message) => AppError::InvalidInput(message),
        };
        HttpAppError(app_error)
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app_error = match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("Record not found: {}", key)),
            StorageError::InvalidKey(message) => AppError::InvalidInput(message),
            other => AppError::Storage(other.to_string()),
        };
        HttpAppError(app_error)
    }
}

static HIDE_ERROR_DETAILS: OnceLock<bool> = OnceLock::new();

/// Hide `details` and `error_type` in every error body. Set once at startup from
/// the configured environment; later calls are ignored.
pub fn hide_error_details(hide: bool) {
    let _ = HIDE_ERROR_DETAILS.set(hide);
}

fn error_details_hidden() -> bool {
    HIDE_ERROR_DETAILS.get().copied().unwrap_or(false)
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details are never shown for sensitive errors, and never in production.
        let show_details = !error_details_hidden() && !app_error.is_sensitive();

        let body = Json(ErrorResponse {
            error: app_error.client_message(),
            details: show_details.then(|| app_error.detailed_message()),
            error_type: show_details.then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        });

        (status, body).into_response()
    }
}

/// Render a batch upload failure. In legacy mode every failure is reported as
/// 500, with the same body.
pub fn batch_error_response(error: HttpAppError, legacy_status: bool) -> Response {
    let mut response = error.into_response();
    if legacy_status {
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    }
    response
}
