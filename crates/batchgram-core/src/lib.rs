//! Batchgram Core Library
//!
//! This crate provides core domain models, error types, configuration, and batch
//! validation that are shared across all Batchgram components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    create_batch_id, BatchId, BatchUploadItem, FileDescriptor, MediaCategory, StoredMetadata,
    UploadResultRecord,
};
pub use storage_types::MetadataBackend;
pub use validation::{validate_batch, BatchRules, BatchValidationError};
