//! Data models for the application
//!
//! Each sub-module represents a stage of the batch relay: the uploaded files,
//! the batch correlation id, and the metadata records written after relaying.

mod batch;
mod file;
mod metadata;

pub use batch::{create_batch_id, BatchId};
pub use file::{FileDescriptor, MediaCategory};
pub use metadata::{BatchUploadItem, StoredMetadata, UploadResultRecord};
