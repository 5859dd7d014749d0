//! Test helpers: build AppState and router for integration tests.
//!
//! Telegram is replaced by a wiremock server; backoff sleeps are recorded
//! instead of awaited. Run with `cargo test -p batchgram-api`.

#![allow(dead_code)]

pub mod fixtures;
pub mod storage;

use async_trait::async_trait;
use axum_test::TestServer;
use batchgram_api::setup::routes;
use batchgram_api::state::AppState;
use batchgram_core::config::RelayConfig;
use batchgram_core::{Config, MetadataBackend};
use batchgram_infra::Sleeper;
use batchgram_storage::{InMemoryMetadataStore, MetadataStore};
use batchgram_telegram::TelegramClient;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::MockServer;

pub const TEST_CHAT_ID: &str = "-1001234567890";
pub const TEST_BOT_TOKEN: &str = "123456:TEST-token";

/// Path of the media group method on the mock Telegram server.
pub fn send_media_group_path() -> String {
    format!("/bot{}/sendMediaGroup", TEST_BOT_TOKEN)
}

pub fn get_file_path() -> String {
    format!("/bot{}/getFile", TEST_BOT_TOKEN)
}

pub fn download_path(file_path: &str) -> String {
    format!("/file/bot{}/{}", TEST_BOT_TOKEN, file_path)
}

/// Sleeper that records requested delays and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

/// Which metadata store the app is built with.
pub enum StoreSetup {
    Memory,
    Disabled,
    Custom(Arc<dyn MetadataStore>),
}

pub struct TestOptions {
    pub store: StoreSetup,
    pub legacy_error_status: bool,
    pub max_file_size_bytes: Option<usize>,
    /// Point the client at this base URL instead of the mock server.
    pub telegram_base_url: Option<String>,
    pub telegram_timeout: Duration,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            store: StoreSetup::Memory,
            legacy_error_status: false,
            max_file_size_bytes: None,
            telegram_base_url: None,
            telegram_timeout: Duration::from_secs(5),
        }
    }
}

/// Test application: server, mock Telegram, and observable collaborators.
pub struct TestApp {
    pub server: TestServer,
    pub telegram: MockServer,
    /// Set when built with `StoreSetup::Memory`.
    pub store: Option<InMemoryMetadataStore>,
    pub sleeper: Arc<RecordingSleeper>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn memory_store(&self) -> &InMemoryMetadataStore {
        self.store.as_ref().expect("app was built without a memory store")
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestOptions::default()).await
}

pub async fn setup_test_app_with(options: TestOptions) -> TestApp {
    let telegram = MockServer::start().await;
    let base_url = options
        .telegram_base_url
        .clone()
        .unwrap_or_else(|| telegram.uri());

    let mut relay = RelayConfig::with_credentials(TEST_CHAT_ID, TEST_BOT_TOKEN);
    relay.base.environment = "test".to_string();
    relay.telegram_api_base_url = base_url.clone();
    relay.telegram_timeout_secs = 5;
    relay.legacy_error_status = options.legacy_error_status;
    if let Some(max) = options.max_file_size_bytes {
        relay.max_file_size_bytes = max;
    }

    let (store, metadata_store): (Option<InMemoryMetadataStore>, Option<Arc<dyn MetadataStore>>) =
        match options.store {
            StoreSetup::Memory => {
                relay.metadata_backend = MetadataBackend::Memory;
                let store = InMemoryMetadataStore::new();
                (Some(store.clone()), Some(Arc::new(store)))
            }
            StoreSetup::Disabled => {
                relay.metadata_backend = MetadataBackend::None;
                (None, None)
            }
            StoreSetup::Custom(custom) => (None, Some(custom)),
        };

    let config = Config::new(relay);
    let client = TelegramClient::new(
        base_url,
        TEST_BOT_TOKEN,
        TEST_CHAT_ID,
        options.telegram_timeout,
    )
    .expect("Failed to create Telegram client");

    let sleeper = Arc::new(RecordingSleeper::default());
    let state = Arc::new(AppState::new(
        config.clone(),
        client,
        metadata_store,
        sleeper.clone(),
    ));

    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        telegram,
        store,
        sleeper,
    }
}
