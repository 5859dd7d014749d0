//! Telegram Bot API client for the relay.
//!
//! Sends a batch of files as one media group and resolves stored files back to
//! downloadable content. The bot token is part of every request URL, so URLs are
//! never logged and transport errors are stripped of them before they surface.

pub mod api;
pub mod error;

use anyhow::{Context, Result};
use batchgram_core::{BatchId, Config, FileDescriptor};
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub use api::{
    attachment_name, build_media_group, GetFileResponse, MediaGroupItem, MessageMedia,
    SendMediaGroupResponse, TelegramFile,
};
pub use error::{UploadError, NETWORK_ERROR_MESSAGE, UPLOAD_FAILED_MESSAGE};

/// Upper bound on establishing a connection, independent of payload size.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Slowest transfer rate tolerated before a request times out.
const MIN_TRANSFER_BYTES_PER_SEC: u64 = 256 * 1024;

/// A file being fetched from Telegram. The body is streamed, not buffered.
pub struct FileDownload {
    pub content_length: Option<u64>,
    pub stream: BoxStream<'static, Result<Bytes, UploadError>>,
}

/// HTTP client for one bot and one destination chat.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    /// Time allowed for Telegram to answer, on top of the transfer itself.
    response_timeout: Duration,
    api_base_url: String,
    bot_token: String,
    chat_id: String,
}

impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient")
            .field("api_base_url", &self.api_base_url)
            .field("response_timeout", &self.response_timeout)
            .field("bot_token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramClient {
    pub fn new(
        api_base_url: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        // Request timeouts are set per request from the payload size.
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            response_timeout: timeout,
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.telegram_api_base_url(),
            config.telegram_bot_token(),
            config.telegram_chat_id(),
            config.telegram_timeout(),
        )
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base_url, self.bot_token, method)
    }

    /// Request timeout for moving `bytes` of payload.
    fn transfer_timeout(&self, bytes: u64) -> Duration {
        self.response_timeout + Duration::from_secs(bytes / MIN_TRANSFER_BYTES_PER_SEC)
    }

    /// Send `files` as a single media group. Exactly one request is made; the
    /// returned messages are index-aligned with `files`.
    pub async fn send_media_group(
        &self,
        files: &[FileDescriptor],
        batch_id: &BatchId,
    ) -> Result<Vec<MessageMedia>, UploadError> {
        let form = self.media_group_form(files, batch_id)?;
        let payload_bytes: u64 = files.iter().map(|f| f.content.len() as u64).sum();

        tracing::info!(
            chat_id = %self.chat_id,
            batch_id = %batch_id,
            file_count = files.len(),
            "Relaying media group to Telegram"
        );

        let response = self
            .client
            .post(self.method_url("sendMediaGroup"))
            .timeout(self.transfer_timeout(payload_bytes))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                let err = UploadError::from(e);
                tracing::warn!(
                    error = ?err,
                    batch_id = %batch_id,
                    "sendMediaGroup transport failure"
                );
                err
            })?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let err = UploadError::rejected(status.as_u16(), &String::from_utf8_lossy(&body));
            tracing::warn!(
                status = status.as_u16(),
                error = %err,
                batch_id = %batch_id,
                "Telegram rejected media group"
            );
            return Err(err);
        }

        let parsed: SendMediaGroupResponse = serde_json::from_slice(&body)
            .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;

        if !parsed.ok {
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                description: parsed
                    .description
                    .unwrap_or_else(|| UPLOAD_FAILED_MESSAGE.to_string()),
            });
        }

        tracing::debug!(
            batch_id = %batch_id,
            message_count = parsed.result.len(),
            "Media group accepted"
        );

        Ok(parsed.result)
    }

    fn media_group_form(
        &self,
        files: &[FileDescriptor],
        batch_id: &BatchId,
    ) -> Result<Form, UploadError> {
        let media = serde_json::to_string(&build_media_group(files, batch_id))
            .map_err(|e| UploadError::InvalidRequest(e.to_string()))?;

        let mut form = Form::new()
            .text("chat_id", self.chat_id.clone())
            .text("media", media);

        for (index, file) in files.iter().enumerate() {
            let part = Part::stream_with_length(file.content.clone(), file.content.len() as u64)
                .file_name(file.name.clone())
                .mime_str(&file.mime_type)
                .map_err(|_| {
                    UploadError::InvalidRequest(format!(
                        "Invalid content type \"{}\" for {}",
                        file.mime_type, file.name
                    ))
                })?;
            form = form.part(attachment_name(index), part);
        }

        Ok(form)
    }

    /// Resolve a file id to its download path.
    pub async fn get_file(&self, file_id: &str) -> Result<TelegramFile, UploadError> {
        let response = self
            .client
            .get(self.method_url("getFile"))
            .timeout(self.response_timeout)
            .query(&[("file_id", file_id)])
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(UploadError::rejected(
                status.as_u16(),
                &String::from_utf8_lossy(&body),
            ));
        }

        let parsed: GetFileResponse = serde_json::from_slice(&body)
            .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;

        match parsed.result {
            Some(file) if parsed.ok => Ok(file),
            _ => Err(UploadError::Rejected {
                status: status.as_u16(),
                description: parsed
                    .description
                    .unwrap_or_else(|| "File not available".to_string()),
            }),
        }
    }

    /// Start downloading the content at a path returned by
    /// [`get_file`](Self::get_file). `size_hint` sizes the request timeout.
    pub async fn download_file(
        &self,
        file_path: &str,
        size_hint: Option<u64>,
    ) -> Result<FileDownload, UploadError> {
        let url = format!(
            "{}/file/bot{}/{}",
            self.api_base_url,
            self.bot_token,
            file_path.trim_start_matches('/')
        );

        let response = self
            .client
            .get(url)
            .timeout(self.transfer_timeout(size_hint.unwrap_or(0)))
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::rejected(status.as_u16(), &body));
        }

        Ok(FileDownload {
            content_length: response.content_length(),
            stream: response.bytes_stream().map_err(UploadError::from).boxed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN: &str = "123456:test-token";

    fn client(server: &MockServer) -> TelegramClient {
        TelegramClient::new(server.uri(), TOKEN, "-1001234", Duration::from_secs(5)).unwrap()
    }

    fn jpegs(count: usize) -> Vec<FileDescriptor> {
        (0..count)
            .map(|i| {
                FileDescriptor::new(
                    format!("photo{}.jpg", i),
                    "image/jpeg",
                    Bytes::from(vec![0xFF; 1024]),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_send_media_group_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/bot{}/sendMediaGroup", TOKEN)))
            .and(body_string_contains("name=\"chat_id\""))
            .and(body_string_contains("-1001234"))
            .and(body_string_contains("attach://file1"))
            .and(body_string_contains("Batch: batch_1_abc"))
            .and(body_string_contains("name=\"file0\"; filename=\"photo0.jpg\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": [
                    {"message_id": 1, "photo": [{"file_id": "s0", "file_size": 10}, {"file_id": "L0", "file_size": 900}]},
                    {"message_id": 2, "photo": [{"file_id": "s1", "file_size": 10}, {"file_id": "L1", "file_size": 800}]}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let messages = client(&server)
            .send_media_group(&jpegs(2), &BatchId::from("batch_1_abc".to_string()))
            .await
            .unwrap();

        let ids: Vec<_> = messages.iter().map(|m| m.file_id()).collect();
        assert_eq!(ids, vec![Some("L0"), Some("L1")]);
    }

    #[tokio::test]
    async fn test_send_media_group_rejected_passes_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .send_media_group(&jpegs(2), &BatchId::from("batch_1_abc".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Rejected { status: 400, .. }));
        assert_eq!(err.to_string(), "Bad Request: chat not found");
    }

    #[tokio::test]
    async fn test_send_media_group_rejected_without_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let err = client(&server)
            .send_media_group(&jpegs(2), &BatchId::from("batch_1_abc".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), UPLOAD_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_send_media_group_malformed_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client(&server)
            .send_media_group(&jpegs(2), &BatchId::from("batch_1_abc".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_send_media_group_network_failure() {
        // Nothing listens on the port once the server is dropped.
        let uri = {
            let server = MockServer::start().await;
            server.uri()
        };
        let client = TelegramClient::new(uri, TOKEN, "-1", Duration::from_secs(2)).unwrap();

        let err = client
            .send_media_group(&jpegs(2), &BatchId::from("batch_1_abc".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Unreachable(_)));
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
        assert!(!format!("{:?}", err).contains(TOKEN));
    }

    #[tokio::test]
    async fn test_send_media_group_timeout_is_not_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"ok": true, "result": []}))
                    .set_delay(Duration::from_secs(2)),
            )
            .expect(1)
            .mount(&server)
            .await;
        let client =
            TelegramClient::new(server.uri(), TOKEN, "-1", Duration::from_millis(200)).unwrap();

        let err = client
            .send_media_group(&jpegs(2), &BatchId::from("batch_1_abc".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Network(_)));
        assert!(!err.is_retryable());
        assert!(!format!("{:?}", err).contains(TOKEN));
    }

    #[test]
    fn test_transfer_timeout_grows_with_payload() {
        let client =
            TelegramClient::new("http://localhost", TOKEN, "-1", Duration::from_secs(60)).unwrap();
        assert_eq!(client.transfer_timeout(0), Duration::from_secs(60));
        assert_eq!(
            client.transfer_timeout(500 * 1024 * 1024),
            Duration::from_secs(60 + 2000)
        );
    }

    #[tokio::test]
    async fn test_get_file_and_download() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/bot{}/getFile", TOKEN)))
            .and(query_param("file_id", "L0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"file_id": "L0", "file_size": 4, "file_path": "photos/file_0.jpg"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/file/bot{}/photos/file_0.jpg", TOKEN)))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3, 4]))
            .mount(&server)
            .await;

        let client = client(&server);
        let file = client.get_file("L0").await.unwrap();
        assert_eq!(file.file_path.as_deref(), Some("photos/file_0.jpg"));

        let download = client
            .download_file(file.file_path.as_deref().unwrap(), file.file_size)
            .await
            .unwrap();
        assert_eq!(download.content_length, Some(4));
        let chunks: Vec<Bytes> = download.stream.try_collect().await.unwrap();
        assert_eq!(chunks.concat(), vec![1u8, 2, 3, 4]);
    }

    #[test]
    fn test_debug_redacts_token() {
        let client =
            TelegramClient::new("http://localhost", TOKEN, "-1", Duration::from_secs(1)).unwrap();
        assert!(!format!("{:?}", client).contains(TOKEN));
    }
}
