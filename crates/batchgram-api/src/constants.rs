//! Route paths and multipart field names

/// Batch upload endpoint
pub const BATCH_UPLOAD_PATH: &str = "/batch-upload";

/// Multipart field carrying the files; repeated once per file.
pub const FILES_FIELD: &str = "files";

/// Relayed files are served under this prefix as `/file/{id}.{ext}`.
pub const FILE_PATH: &str = "/file/{key}";

pub const METADATA_PATH: &str = "/api/metadata/{key}";

pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Headroom on top of the file payload for multipart boundaries and headers.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;
