//! Bot API wire types.
//!
//! Only the fields the relay reads are modelled; everything else in Telegram's
//! responses is ignored during deserialization.

use batchgram_core::{BatchId, FileDescriptor, MediaCategory};
use serde::{Deserialize, Serialize};

/// Multipart field name of the attachment at `index`.
pub fn attachment_name(index: usize) -> String {
    format!("file{}", index)
}

/// One entry of the `media` field of `sendMediaGroup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaGroupItem {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// `attach://file{index}`, pointing at a multipart part of the same request.
    pub media: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Build one item per file, in order. Images become photos, anything else is
/// sent as a video. The batch caption goes on the first item only.
pub fn build_media_group(files: &[FileDescriptor], batch_id: &BatchId) -> Vec<MediaGroupItem> {
    files
        .iter()
        .enumerate()
        .map(|(index, file)| {
            let kind = match file.category() {
                Some(MediaCategory::Image) => MediaCategory::Image.telegram_kind(),
                _ => MediaCategory::Video.telegram_kind(),
            };
            MediaGroupItem {
                kind,
                media: format!("attach://{}", attachment_name(index)),
                caption: (index == 0).then(|| format!("Batch: {}", batch_id)),
            }
        })
        .collect()
}

/// Body of a failed call; only the description is surfaced.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub description: Option<String>,
}

/// Response of `sendMediaGroup`: the sent messages, index-aligned with `media`.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMediaGroupResponse {
    pub ok: bool,
    #[serde(default)]
    pub result: Vec<MessageMedia>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// A single-file attachment (video, document, audio).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileRef {
    pub file_id: String,
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// The media carried by one sent message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawMessage")]
pub enum MessageMedia {
    /// Every size variant Telegram generated for the photo.
    Photo(Vec<PhotoSize>),
    Video(FileRef),
    Document(FileRef),
    Audio(FileRef),
    Unknown,
}

#[derive(Deserialize)]
struct RawMessage {
    #[serde(default)]
    photo: Option<Vec<PhotoSize>>,
    #[serde(default)]
    video: Option<FileRef>,
    #[serde(default)]
    document: Option<FileRef>,
    #[serde(default)]
    audio: Option<FileRef>,
}

impl From<RawMessage> for MessageMedia {
    fn from(raw: RawMessage) -> Self {
        if let Some(photo) = raw.photo {
            MessageMedia::Photo(photo)
        } else if let Some(video) = raw.video {
            MessageMedia::Video(video)
        } else if let Some(document) = raw.document {
            MessageMedia::Document(document)
        } else if let Some(audio) = raw.audio {
            MessageMedia::Audio(audio)
        } else {
            MessageMedia::Unknown
        }
    }
}

impl MessageMedia {
    /// External file id of the message. For photos this is the largest variant;
    /// on equal sizes the later variant wins.
    pub fn file_id(&self) -> Option<&str> {
        match self {
            MessageMedia::Photo(sizes) => sizes
                .iter()
                .max_by_key(|size| size.file_size.unwrap_or(0))
                .map(|size| size.file_id.as_str()),
            MessageMedia::Video(file) | MessageMedia::Document(file) | MessageMedia::Audio(file) => {
                Some(file.file_id.as_str())
            }
            MessageMedia::Unknown => None,
        }
    }
}

/// Response of `getFile`.
#[derive(Debug, Clone, Deserialize)]
pub struct GetFileResponse {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<TelegramFile>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelegramFile {
    pub file_id: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    /// Present while the file is downloadable.
    #[serde(default)]
    pub file_path: Option<String>,
}
