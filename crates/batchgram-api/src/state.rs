//! Application state shared by all handlers.

use batchgram_core::Config;
use batchgram_infra::{RetryPolicy, Sleeper};
use batchgram_storage::MetadataStore;
use batchgram_telegram::TelegramClient;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub telegram: TelegramClient,
    /// `None` when metadata recording is disabled.
    pub metadata_store: Option<Arc<dyn MetadataStore>>,
    /// Applied to transport failures of the relay call only.
    pub retry_policy: RetryPolicy,
    pub sleeper: Arc<dyn Sleeper>,
}

impl AppState {
    pub fn new(
        config: Config,
        telegram: TelegramClient,
        metadata_store: Option<Arc<dyn MetadataStore>>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let retry_policy =
            RetryPolicy::new(config.relay_max_retries(), config.relay_retry_base_delay());
        Self {
            config,
            telegram,
            metadata_store,
            retry_policy,
            sleeper,
        }
    }
}
