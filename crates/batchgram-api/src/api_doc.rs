//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use batchgram_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Batchgram API",
        version = "0.1.0",
        description = "Batch upload relay: validates 2-10 images or videos, sends them to a Telegram chat as one media group, and records per-file metadata."
    ),
    paths(
        handlers::batch_upload::batch_upload,
        handlers::file::get_file,
        handlers::metadata::get_metadata,
        handlers::health::liveness_check,
        handlers::health::readiness_check,
    ),
    components(schemas(
        models::BatchUploadItem,
        models::StoredMetadata,
        models::MediaCategory,
        error::ErrorResponse,
        handlers::health::ReadinessResponse,
    )),
    tags(
        (name = "uploads", description = "Batch relay"),
        (name = "files", description = "Relayed files and their metadata"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
