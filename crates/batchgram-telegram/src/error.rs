use thiserror::Error;

/// Fallback reported when Telegram rejects a request without a description.
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload to Telegram";

/// Reported for transport failures. Transport details are logged, never returned.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred during upload";

/// Errors from a relay call
#[derive(Debug, Error)]
pub enum UploadError {
    /// Telegram answered and refused the request.
    #[error("{description}")]
    Rejected { status: u16, description: String },

    /// The connection was never established, so Telegram cannot have seen the
    /// request.
    #[error("Network error occurred during upload")]
    Unreachable(String),

    /// The request failed after the connection was made (timeout, reset, body
    /// read). Telegram may already have acted on it.
    #[error("Network error occurred during upload")]
    Network(String),

    /// Telegram answered with a success status but the body could not be read.
    #[error("Unexpected response from Telegram: {0}")]
    MalformedResponse(String),

    /// The outbound request could not be assembled.
    #[error("Invalid relay request: {0}")]
    InvalidRequest(String),
}

impl UploadError {
    /// Whether the request may be sent again. `sendMediaGroup` is not
    /// idempotent, so only requests that never reached Telegram qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(self, UploadError::Unreachable(_))
    }

    /// Transport failure of either kind.
    pub fn is_transport(&self) -> bool {
        matches!(self, UploadError::Unreachable(_) | UploadError::Network(_))
    }

    /// Build a rejection from a non-success status and the raw response body.
    pub(crate) fn rejected(status: u16, body: &str) -> Self {
        let description = serde_json::from_str::<crate::api::ErrorBody>(body)
            .ok()
            .and_then(|b| b.description)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| UPLOAD_FAILED_MESSAGE.to_string());
        UploadError::Rejected {
            status,
            description,
        }
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        let is_connect = err.is_connect();
        // Request URLs carry the bot token.
        let detail = err.without_url().to_string();
        if is_connect {
            UploadError::Unreachable(detail)
        } else {
            UploadError::Network(detail)
        }
    }
}
