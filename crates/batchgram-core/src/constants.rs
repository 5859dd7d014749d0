//! Batch limits and defaults shared by the validator, the relay client and the API.

/// Minimum number of files accepted by `sendMediaGroup`.
pub const MIN_FILES: usize = 2;

/// Maximum number of files accepted by `sendMediaGroup`.
pub const MAX_FILES: usize = 10;

/// Default per-file ceiling (Telegram bot upload limit).
pub const MAX_FILE_SIZE_MB: usize = 50;

pub const MAX_FILE_SIZE: usize = MAX_FILE_SIZE_MB * 1024 * 1024;

pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

pub const ALLOWED_VIDEO_TYPES: [&str; 3] = ["video/mp4", "video/webm", "video/ogg"];

/// Value written to `ListType` and `Label` for freshly uploaded files.
pub const DEFAULT_LIST_TYPE: &str = "None";
pub const DEFAULT_LABEL: &str = "None";

/// Public path prefix under which relayed files are served.
pub const FILE_ROUTE_PREFIX: &str = "/file";
