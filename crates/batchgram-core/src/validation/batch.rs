//! Batch composition rules for media group uploads.
//!
//! A batch is valid when it has between `min_files` and `max_files` items, no
//! item exceeds `max_file_size`, every item is an allowed image or video type,
//! and all items share the category of the first one. Checks run in that order
//! and files are scanned in input order; the first violation is reported.

use crate::constants::{MAX_FILES, MAX_FILE_SIZE, MIN_FILES};
use crate::models::{FileDescriptor, MediaCategory};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchValidationError {
    #[error("Batch upload requires at least {min} files (got {actual})")]
    TooFewFiles { min: usize, actual: usize },

    #[error("Batch upload supports at most {max} files (got {actual})")]
    TooManyFiles { max: usize, actual: usize },

    #[error("File \"{file_name}\" exceeds the {}MB size limit", .max / 1024 / 1024)]
    FileTooLarge {
        file_name: String,
        size: usize,
        max: usize,
    },

    #[error("File \"{file_name}\" has unsupported type {content_type}; only images and videos are allowed")]
    UnsupportedType {
        file_name: String,
        content_type: String,
    },

    #[error("All files in a batch must be the same type (all images or all videos)")]
    MixedTypes {
        expected: MediaCategory,
        file_name: String,
    },
}

/// Limits applied to one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRules {
    pub min_files: usize,
    pub max_files: usize,
    pub max_file_size: usize,
}

impl Default for BatchRules {
    fn default() -> Self {
        Self {
            min_files: MIN_FILES,
            max_files: MAX_FILES,
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

impl BatchRules {
    pub fn with_max_file_size(max_file_size: usize) -> Self {
        Self {
            max_file_size,
            ..Self::default()
        }
    }
}

/// Validate a batch and return its category.
pub fn validate_batch(
    files: &[FileDescriptor],
    rules: &BatchRules,
) -> Result<MediaCategory, BatchValidationError> {
    if files.len() < rules.min_files {
        return Err(BatchValidationError::TooFewFiles {
            min: rules.min_files,
            actual: files.len(),
        });
    }

    if files.len() > rules.max_files {
        return Err(BatchValidationError::TooManyFiles {
            max: rules.max_files,
            actual: files.len(),
        });
    }

    let mut batch_category: Option<MediaCategory> = None;

    for file in files {
        if file.size > rules.max_file_size {
            return Err(BatchValidationError::FileTooLarge {
                file_name: file.name.clone(),
                size: file.size,
                max: rules.max_file_size,
            });
        }

        let category = file
            .category()
            .ok_or_else(|| BatchValidationError::UnsupportedType {
                file_name: file.name.clone(),
                content_type: file.mime_type.clone(),
            })?;

        match batch_category {
            None => batch_category = Some(category),
            Some(expected) if expected != category => {
                return Err(BatchValidationError::MixedTypes {
                    expected,
                    file_name: file.name.clone(),
                });
            }
            Some(_) => {}
        }
    }

    // min_files >= 1 in every configuration we build, but an empty batch with
    // min_files = 0 still has no category to report.
    batch_category.ok_or(BatchValidationError::TooFewFiles {
        min: rules.min_files.max(1),
        actual: 0,
    })
}
