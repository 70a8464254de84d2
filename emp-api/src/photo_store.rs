//! Storage for uploaded employee photos.
//!
//! Uploads are screened by [`check_upload`] (type from the filename
//! extension, size limit) and then handed to a [`PhotoStore`] under a fresh
//! collision-free name.

use std::io;
use std::path::{Path, PathBuf};

use rocket::fs::TempFile;
use rocket::http::ContentType;
use thiserror::Error;
use uuid::Uuid;

/// Largest accepted upload (5 MiB).
pub const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file provided")]
    Missing,

    #[error("Invalid file type. Only JPEG, PNG, and GIF are allowed.")]
    UnsupportedType,

    #[error("File size exceeds 5MB limit.")]
    TooLarge,

    #[error("Failed to save file")]
    Storage(#[from] io::Error),
}

/// Extension of `file_name` including the leading dot, as written by the
/// client (`".PNG"` stays `".PNG"`). Empty when there is none.
pub fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

/// Accepts JPEG, PNG and GIF files up to [`MAX_PHOTO_BYTES`].
///
/// The type is guessed from the filename extension only; file contents are
/// not inspected.
pub fn check_upload(file_name: Option<&str>, size: u64) -> Result<(), UploadError> {
    let content_type = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .and_then(ContentType::from_extension);

    let allowed = [ContentType::JPEG, ContentType::PNG, ContentType::GIF];
    match content_type {
        Some(ct) if allowed.contains(&ct) => {}
        _ => return Err(UploadError::UnsupportedType),
    }

    if size > MAX_PHOTO_BYTES {
        return Err(UploadError::TooLarge);
    }
    Ok(())
}

/// Storage name for an upload: a random UUID plus the original extension.
pub fn storage_name(original_name: &str) -> String {
    format!("{}{}", Uuid::new_v4(), extension_of(original_name))
}

/// A place uploaded photos are written to.
#[rocket::async_trait]
pub trait PhotoStore: Send + Sync {
    /// Stores `file` under `name` and returns the identifier to retrieve it by.
    async fn save(&self, name: &str, file: &mut TempFile<'_>) -> io::Result<String>;
}

/// Keeps photos as files in one local directory.
#[derive(Debug, Clone)]
pub struct LocalPhotoStore {
    root: PathBuf,
}

impl LocalPhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[rocket::async_trait]
impl PhotoStore for LocalPhotoStore {
    async fn save(&self, name: &str, file: &mut TempFile<'_>) -> io::Result<String> {
        rocket::tokio::fs::create_dir_all(&self.root).await?;
        file.copy_to(self.root.join(name)).await?;
        Ok(name.to_string())
    }
}
