pub mod batch_upload;
pub mod file;
pub mod health;
pub mod metadata;
