//! Disk-backed object store for product images.
//!
//! Uploaded images are written under the configured upload directory with
//! generated UUID names and served back under `/uploads`. The store owns the
//! mapping between public URLs and filesystem paths so handlers never touch
//! paths directly.

use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use crate::config::AppConfig;

/// Public URL prefix under which stored objects are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Content types accepted for product images, with their file extensions.
const ACCEPTED_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/webp", "webp"),
];

/// Errors raised by the image store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("image exceeds the maximum size of {max_bytes} bytes")]
    TooLarge { max_bytes: usize },
    #[error("image data is empty")]
    Empty,
    #[error("object store I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Disk-backed store for uploaded product images.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    max_bytes: usize,
    public_base_url: Option<String>,
}

impl ImageStore {
    /// Create a store from application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            root: PathBuf::from(&config.upload_dir),
            max_bytes: config.upload_max_bytes,
            public_base_url: config.public_base_url.clone(),
        }
    }

    /// Create a store rooted at an explicit directory (useful for tests).
    pub fn new(root: PathBuf, max_bytes: usize) -> Self {
        Self {
            root,
            max_bytes,
            public_base_url: None,
        }
    }

    /// Filesystem directory backing the store; served under `/uploads`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Save image bytes, returning the public URL of the stored object.
    ///
    /// Validates content type and size before touching the filesystem.
    pub async fn save(&self, content_type: &str, data: &[u8]) -> Result<String, StorageError> {
        let extension = ACCEPTED_TYPES
            .iter()
            .find(|(accepted, _)| *accepted == content_type)
            .map(|(_, ext)| *ext)
            .ok_or_else(|| StorageError::UnsupportedContentType(content_type.to_string()))?;

        if data.is_empty() {
            return Err(StorageError::Empty);
        }

        if data.len() > self.max_bytes {
            return Err(StorageError::TooLarge {
                max_bytes: self.max_bytes,
            });
        }

        tokio::fs::create_dir_all(&self.root).await?;

        let object_name = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.root.join(&object_name);
        tokio::fs::write(&path, data).await?;

        tracing::debug!(object = %object_name, bytes = data.len(), "Stored product image");

        Ok(self.public_url(&object_name))
    }

    /// Delete the object behind a public URL.
    ///
    /// A missing file is not an error: the row referencing it is already
    /// gone or going, and repeated deletes must stay idempotent.
    pub async fn delete(&self, url: &str) -> Result<(), StorageError> {
        let Some(object_name) = self.object_name(url) else {
            return Ok(());
        };

        let path = self.root.join(object_name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn public_url(&self, object_name: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}{}/{}", base, PUBLIC_PREFIX, object_name),
            None => format!("{}/{}", PUBLIC_PREFIX, object_name),
        }
    }

    /// Extract the object name from a public URL produced by this store.
    /// URLs pointing elsewhere (absolute URLs of an older base, foreign
    /// hosts) yield None and are left alone.
    fn object_name<'a>(&self, url: &'a str) -> Option<&'a str> {
        let marker = concat!("/uploads", "/");
        let index = url.rfind(marker)?;
        let name = &url[index + marker.len()..];
        // Reject anything that could escape the upload directory.
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return None;
        }
        Some(name)
    }
}
