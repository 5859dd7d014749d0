//! Metadata store setup

use anyhow::{Context, Result};
use batchgram_core::Config;
use batchgram_storage::{create_metadata_store, MetadataStore};
use std::sync::Arc;

/// Create the configured metadata store and verify it is usable.
pub async fn setup_metadata_store(config: &Config) -> Result<Option<Arc<dyn MetadataStore>>> {
    tracing::info!(backend = %config.metadata_backend(), "Initializing metadata store...");

    let store = create_metadata_store(config)
        .await
        .context("Failed to create metadata store")?;

    match &store {
        Some(store) => {
            store
                .health_check()
                .await
                .context("Metadata store health check failed")?;
            tracing::info!(
                backend = %store.backend_type(),
                path = ?config.metadata_local_path(),
                "Metadata store initialized successfully"
            );
        }
        None => tracing::warn!("Metadata recording disabled; relayed files will not be recorded"),
    }

    Ok(store)
}
