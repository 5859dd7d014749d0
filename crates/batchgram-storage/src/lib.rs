//! Batchgram Storage Library
//!
//! This crate provides the metadata store abstraction and its implementations.
//! It includes the MetadataStore trait and in-memory and local filesystem backends.
//!
//! # Key format
//!
//! Every relayed file is recorded under `{external_file_id}.{extension}`, the same
//! key that appears in the public `/file/{key}` path. Keys must not contain `..`,
//! a path separator, or be empty. Key handling is centralized in the `keys` module
//! so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-memory")]
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use batchgram_core::MetadataBackend;
pub use factory::create_metadata_store;
pub use keys::validate_key;
#[cfg(feature = "storage-local")]
pub use local::LocalMetadataStore;
#[cfg(feature = "storage-memory")]
pub use memory::InMemoryMetadataStore;
pub use traits::{MetadataStore, StorageError, StorageResult, StoredRecord};
