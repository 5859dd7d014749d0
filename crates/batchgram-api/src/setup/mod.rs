//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use batchgram_core::Config;
use batchgram_infra::TokioSleeper;
use batchgram_telegram::TelegramClient;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    batchgram_infra::init_telemetry(
        env!("CARGO_PKG_NAME"),
        config.environment(),
        config.is_production(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(config = ?config.0, "Configuration loaded and validated successfully");

    crate::error::hide_error_details(config.is_production());

    let telegram = TelegramClient::from_config(&config)?;
    let metadata_store = storage::setup_metadata_store(&config).await?;

    let state = Arc::new(AppState::new(
        config.clone(),
        telegram,
        metadata_store,
        Arc::new(TokioSleeper),
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
