//! Route configuration and setup

use crate::constants::{
    BATCH_UPLOAD_PATH, FILE_PATH, METADATA_PATH, MULTIPART_OVERHEAD_BYTES, OPENAPI_PATH,
};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use batchgram_core::Config;
use batchgram_infra::request_id_middleware;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let body_limit = max_request_body_bytes(config);

    tracing::info!(body_limit_bytes = body_limit, "Request body limit configured");

    let upload_routes = Router::new()
        .route(BATCH_UPLOAD_PATH, post(handlers::batch_upload::batch_upload))
        // The multipart extractor's own 2MB default would cut batches short.
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit));

    let app = Router::new()
        .route("/health", get(handlers::health::liveness_check))
        .route("/health/ready", get(handlers::health::readiness_check))
        .route(FILE_PATH, get(handlers::file::get_file))
        .route(METADATA_PATH, get(handlers::metadata::get_metadata))
        .route(
            OPENAPI_PATH,
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .merge(upload_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

/// Largest accepted batch: every file at the size ceiling plus multipart framing.
fn max_request_body_bytes(config: &Config) -> usize {
    let rules = config.batch_rules();
    rules
        .max_files
        .saturating_mul(rules.max_file_size)
        .saturating_add(MULTIPART_OVERHEAD_BYTES)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
