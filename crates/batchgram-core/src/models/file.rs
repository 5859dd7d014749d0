use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

use crate::constants::{ALLOWED_IMAGE_TYPES, ALLOWED_VIDEO_TYPES};

/// Coarse type category of a batch. A batch never mixes categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    Image,
    Video,
}

impl MediaCategory {
    /// Classify a declared MIME type against the image and video allowlists.
    /// Returns `None` for anything outside both.
    pub fn from_mime(content_type: &str) -> Option<Self> {
        let normalized = normalize_mime_type(content_type).to_lowercase();
        if ALLOWED_IMAGE_TYPES.contains(&normalized.as_str()) {
            Some(MediaCategory::Image)
        } else if ALLOWED_VIDEO_TYPES.contains(&normalized.as_str()) {
            Some(MediaCategory::Video)
        } else {
            None
        }
    }

    /// Media type name used by `sendMediaGroup` (`InputMediaPhoto` / `InputMediaVideo`).
    pub fn telegram_kind(&self) -> &'static str {
        match self {
            MediaCategory::Image => "photo",
            MediaCategory::Video => "video",
        }
    }
}

impl Display for MediaCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaCategory::Image => write!(f, "image"),
            MediaCategory::Video => write!(f, "video"),
        }
    }
}

/// Strip MIME parameters (e.g. "image/jpeg; charset=utf-8" -> "image/jpeg").
pub fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

/// One uploaded file as received from the multipart body.
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    pub name: String,
    pub size: usize,
    pub mime_type: String,
    pub content: Bytes,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Bytes) -> Self {
        Self {
            name: name.into(),
            size: content.len(),
            mime_type: mime_type.into(),
            content,
        }
    }

    pub fn category(&self) -> Option<MediaCategory> {
        MediaCategory::from_mime(&self.mime_type)
    }

    /// Lower-cased text after the last `.` of the file name. A name without a dot
    /// yields the whole name lower-cased, matching how the record keys were always built.
    pub fn extension(&self) -> String {
        self.name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime_classifies_allowlists() {
        assert_eq!(MediaCategory::from_mime("image/png"), Some(MediaCategory::Image));
        assert_eq!(MediaCategory::from_mime("video/webm"), Some(MediaCategory::Video));
        assert_eq!(MediaCategory::from_mime("IMAGE/JPEG; charset=binary"), Some(MediaCategory::Image));
        assert_eq!(MediaCategory::from_mime("application/pdf"), None);
        assert_eq!(MediaCategory::from_mime("image/svg+xml"), None);
    }

    #[test]
    fn test_extension_uses_last_suffix() {
        let file = FileDescriptor::new("Holiday.Photo.JPG", "image/jpeg", Bytes::from_static(b"x"));
        assert_eq!(file.extension(), "jpg");
        assert_eq!(file.size, 1);

        let no_dot = FileDescriptor::new("README", "image/png", Bytes::new());
        assert_eq!(no_dot.extension(), "readme");
    }

    #[test]
    fn test_telegram_kind() {
        assert_eq!(MediaCategory::Image.telegram_kind(), "photo");
        assert_eq!(MediaCategory::Video.telegram_kind(), "video");
    }
}
