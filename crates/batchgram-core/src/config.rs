//! Configuration module
//!
//! This module provides the configuration for the relay service: HTTP server
//! settings, Telegram credentials, retry tuning, batch limits and the metadata
//! store. Everything is read from the environment once at startup and passed
//! explicitly to the application state.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::MAX_FILE_SIZE_MB;
use crate::storage_types::MetadataBackend;
use crate::validation::BatchRules;

// Common constants
const SERVER_PORT: u16 = 8788;
const TELEGRAM_API_BASE_URL: &str = "https://api.telegram.org";
const TELEGRAM_TIMEOUT_SECS: u64 = 60;
const RELAY_MAX_RETRIES: u32 = 3;
const RELAY_RETRY_BASE_DELAY_MS: u64 = 1000;

/// HTTP server settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
        }
    }
}

/// Relay configuration
#[derive(Clone)]
pub struct RelayConfig {
    pub base: BaseConfig,
    // Telegram destination and credential
    pub telegram_chat_id: String,
    pub telegram_bot_token: String,
    pub telegram_api_base_url: String,
    pub telegram_timeout_secs: u64,
    // Retry of transport failures on the relay call
    pub relay_max_retries: u32,
    pub relay_retry_base_delay_ms: u64,
    // Batch limits
    pub max_file_size_bytes: usize,
    // Metadata store
    pub metadata_backend: MetadataBackend,
    pub metadata_local_path: Option<String>,
    /// Report every batch upload failure as HTTP 500.
    pub legacy_error_status: bool,
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("base", &self.base)
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("telegram_bot_token", &"[REDACTED]")
            .field("telegram_api_base_url", &self.telegram_api_base_url)
            .field("telegram_timeout_secs", &self.telegram_timeout_secs)
            .field("relay_max_retries", &self.relay_max_retries)
            .field("relay_retry_base_delay_ms", &self.relay_retry_base_delay_ms)
            .field("max_file_size_bytes", &self.max_file_size_bytes)
            .field("metadata_backend", &self.metadata_backend)
            .field("metadata_local_path", &self.metadata_local_path)
            .field("legacy_error_status", &self.legacy_error_status)
            .finish()
    }
}

impl RelayConfig {
    /// Configuration with the given credentials and every other setting at its default.
    pub fn with_credentials(chat_id: impl Into<String>, bot_token: impl Into<String>) -> Self {
        Self {
            base: BaseConfig::default(),
            telegram_chat_id: chat_id.into(),
            telegram_bot_token: bot_token.into(),
            telegram_api_base_url: TELEGRAM_API_BASE_URL.to_string(),
            telegram_timeout_secs: TELEGRAM_TIMEOUT_SECS,
            relay_max_retries: RELAY_MAX_RETRIES,
            relay_retry_base_delay_ms: RELAY_RETRY_BASE_DELAY_MS,
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            metadata_backend: MetadataBackend::Memory,
            metadata_local_path: None,
            legacy_error_status: false,
        }
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
        };

        let telegram_chat_id = env::var("TG_CHAT_ID")
            .or_else(|_| env::var("TG_Chat_ID"))
            .map_err(|_| anyhow::anyhow!("TG_CHAT_ID must be set to the destination chat"))?;

        let telegram_bot_token = env::var("TG_BOT_TOKEN")
            .or_else(|_| env::var("TG_Bot_Token"))
            .map_err(|_| anyhow::anyhow!("TG_BOT_TOKEN must be set to the bot API token"))?;

        let max_file_size_mb: usize = parse_env("MAX_FILE_SIZE_MB", MAX_FILE_SIZE_MB)?;

        let metadata_backend = match env::var("METADATA_BACKEND") {
            Ok(value) => value.parse::<MetadataBackend>()?,
            Err(_) => MetadataBackend::Memory,
        };

        let config = RelayConfig {
            base,
            telegram_chat_id,
            telegram_bot_token,
            telegram_api_base_url: env::var("TELEGRAM_API_BASE_URL")
                .unwrap_or_else(|_| TELEGRAM_API_BASE_URL.to_string()),
            telegram_timeout_secs: parse_env("TELEGRAM_TIMEOUT_SECS", TELEGRAM_TIMEOUT_SECS)?,
            relay_max_retries: parse_env("RELAY_MAX_RETRIES", RELAY_MAX_RETRIES)?,
            relay_retry_base_delay_ms: parse_env(
                "RELAY_RETRY_BASE_DELAY_MS",
                RELAY_RETRY_BASE_DELAY_MS,
            )?,
            max_file_size_bytes: megabytes_to_bytes(max_file_size_mb)?,
            metadata_backend,
            metadata_local_path: env::var("METADATA_LOCAL_PATH")
                .ok()
                .filter(|s| !s.is_empty()),
            legacy_error_status: parse_env("LEGACY_ERROR_STATUS", false)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.telegram_chat_id.trim().is_empty() {
            return Err(anyhow::anyhow!("TG_CHAT_ID must not be empty"));
        }

        if self.telegram_bot_token.trim().is_empty() {
            return Err(anyhow::anyhow!("TG_BOT_TOKEN must not be empty"));
        }

        if !self.telegram_api_base_url.starts_with("http://")
            && !self.telegram_api_base_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "TELEGRAM_API_BASE_URL must be an http(s) URL"
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than zero"));
        }

        if self.metadata_backend == MetadataBackend::Local && self.metadata_local_path.is_none() {
            return Err(anyhow::anyhow!(
                "METADATA_LOCAL_PATH must be set when using the local metadata backend"
            ));
        }

        Ok(())
    }
}

/// Read `name` from the environment, falling back to `default` when unset.
fn parse_env<T>(name: &str, default: T) -> Result<T, anyhow::Error>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    parse_value(name, env::var(name).ok(), default)
}

fn parse_value<T>(name: &str, raw: Option<String>, default: T) -> Result<T, anyhow::Error>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .to_lowercase()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} has invalid value {:?}: {}", name, value, e)),
    }
}

fn megabytes_to_bytes(mb: usize) -> Result<usize, anyhow::Error> {
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large: {}", mb))
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<RelayConfig>);

impl Config {
    fn as_relay(&self) -> &RelayConfig {
        &self.0
    }

    pub fn new(relay: RelayConfig) -> Self {
        Config(Box::new(relay))
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.as_relay().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = RelayConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_relay().validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.as_relay().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_relay().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_relay().base.environment
    }

    pub fn telegram_chat_id(&self) -> &str {
        &self.as_relay().telegram_chat_id
    }

    pub fn telegram_bot_token(&self) -> &str {
        &self.as_relay().telegram_bot_token
    }

    pub fn telegram_api_base_url(&self) -> &str {
        &self.as_relay().telegram_api_base_url
    }

    pub fn telegram_timeout(&self) -> Duration {
        Duration::from_secs(self.as_relay().telegram_timeout_secs)
    }

    pub fn relay_max_retries(&self) -> u32 {
        self.as_relay().relay_max_retries
    }

    pub fn relay_retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.as_relay().relay_retry_base_delay_ms)
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.as_relay().max_file_size_bytes
    }

    pub fn batch_rules(&self) -> BatchRules {
        BatchRules::with_max_file_size(self.max_file_size_bytes())
    }

    pub fn metadata_backend(&self) -> MetadataBackend {
        self.as_relay().metadata_backend
    }

    pub fn metadata_local_path(&self) -> Option<&str> {
        self.as_relay().metadata_local_path.as_deref()
    }

    pub fn legacy_error_status(&self) -> bool {
        self.as_relay().legacy_error_status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let relay = RelayConfig::with_credentials("-100123", "123:abc");
        assert!(relay.validate().is_ok());

        let config = Config::new(relay);
        assert_eq!(config.relay_max_retries(), 3);
        assert_eq!(config.relay_retry_base_delay(), Duration::from_millis(1000));
        assert_eq!(config.max_file_size_bytes(), 50 * 1024 * 1024);
        assert_eq!(config.metadata_backend(), MetadataBackend::Memory);
        assert_eq!(config.telegram_api_base_url(), "https://api.telegram.org");
        assert!(!config.legacy_error_status());
        assert!(!config.is_production());
    }

    #[test]
    fn test_empty_credentials_rejected() {
        let relay = RelayConfig::with_credentials("", "123:abc");
        assert!(relay.validate().is_err());

        let relay = RelayConfig::with_credentials("-100123", "  ");
        assert!(relay.validate().is_err());
    }

    #[test]
    fn test_local_backend_requires_path() {
        let mut relay = RelayConfig::with_credentials("-100123", "123:abc");
        relay.metadata_backend = MetadataBackend::Local;
        assert!(relay.validate().is_err());

        relay.metadata_local_path = Some("/tmp/batchgram".to_string());
        assert!(relay.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_token() {
        let relay = RelayConfig::with_credentials("-100123", "123:super-secret");
        let debug = format!("{:?}", Config::new(relay));
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let err = parse_value::<u32>("RELAY_MAX_RETRIES", Some("three".to_string()), 3)
            .unwrap_err();
        assert!(err.to_string().contains("RELAY_MAX_RETRIES"));

        assert!(parse_value::<usize>("MAX_FILE_SIZE_MB", Some("-5".to_string()), 50).is_err());
        assert_eq!(parse_value::<u64>("X", Some(" 250 ".to_string()), 1000).unwrap(), 250);
        assert_eq!(parse_value::<u64>("X", None, 1000).unwrap(), 1000);
        assert_eq!(parse_value::<u64>("X", Some(String::new()), 1000).unwrap(), 1000);
    }

    #[test]
    fn test_legacy_flag_parsing() {
        assert!(parse_value("LEGACY_ERROR_STATUS", Some("TRUE".to_string()), false).unwrap());
        assert!(!parse_value("LEGACY_ERROR_STATUS", None, false).unwrap());
        assert!(parse_value::<bool>("LEGACY_ERROR_STATUS", Some("yes".to_string()), false).is_err());
    }

    #[test]
    fn test_file_size_overflow_is_rejected() {
        assert_eq!(megabytes_to_bytes(50).unwrap(), 50 * 1024 * 1024);
        assert!(megabytes_to_bytes(usize::MAX).is_err());
    }

    #[test]
    fn test_batch_rules_follow_size_limit() {
        let mut relay = RelayConfig::with_credentials("-100123", "123:abc");
        relay.max_file_size_bytes = 1024;
        let rules = Config::new(relay).batch_rules();
        assert_eq!(rules.max_file_size, 1024);
        assert_eq!(rules.min_files, 2);
        assert_eq!(rules.max_files, 10);
    }
}
