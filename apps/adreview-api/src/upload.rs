//! Upload validation and scoped temp storage
//!
//! An upload is accepted only when its declared content type is an allowed
//! raster format and its leading bytes carry the same format's signature.
//! The bytes are parked in a temp file for the lifetime of the request;
//! [`TempUpload`] removes it on drop.

use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::ApiError;

/// Raster formats the service accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageKind {
    /// Identify a format from its magic bytes
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageKind::Jpeg)
        } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(ImageKind::Png)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(ImageKind::Gif)
        } else if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Some(ImageKind::Webp)
        } else {
            None
        }
    }

    /// Map a declared content type, ignoring case and parameters
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageKind::Jpeg),
            "image/png" => Some(ImageKind::Png),
            "image/gif" => Some(ImageKind::Gif),
            "image/webp" => Some(ImageKind::Webp),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Gif => "image/gif",
            ImageKind::Webp => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Jpeg => ".jpg",
            ImageKind::Png => ".png",
            ImageKind::Gif => ".gif",
            ImageKind::Webp => ".webp",
        }
    }
}

/// Check the declared type against the allow-list and the actual bytes
pub fn validate_image(declared: Option<&str>, data: &[u8]) -> Result<ImageKind, ApiError> {
    let declared = declared
        .and_then(ImageKind::from_mime)
        .ok_or(ApiError::UnsupportedFileType)?;

    match ImageKind::sniff(data) {
        Some(actual) if actual == declared => Ok(actual),
        actual => {
            debug!(?declared, ?actual, "Upload content does not match declared type");
            Err(ApiError::UnsupportedFileType)
        }
    }
}

/// An uploaded file on disk, removed when dropped
pub struct TempUpload {
    path: PathBuf,
    file: Option<NamedTempFile>,
}

impl TempUpload {
    /// Write `data` to a uniquely named file in `dir`
    pub async fn persist(dir: &Path, extension: &str, data: &[u8]) -> Result<Self, ApiError> {
        let file = tempfile::Builder::new()
            .prefix("adImage-")
            .suffix(extension)
            .tempfile_in(dir)
            .map_err(|e| anyhow::anyhow!("creating upload file in {}: {e}", dir.display()))?;
        let path = file.path().to_path_buf();

        // Own the guard before writing so a failed write still cleans up
        let upload = Self {
            path,
            file: Some(file),
        };
        tokio::fs::write(&upload.path, data)
            .await
            .map_err(|e| anyhow::anyhow!("writing {}: {e}", upload.path.display()))?;

        debug!(path = %upload.path.display(), bytes = data.len(), "Upload stored");
        Ok(upload)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read(&self) -> Result<Vec<u8>, ApiError> {
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|e| anyhow::anyhow!("reading {}: {e}", self.path.display()))?;
        Ok(data)
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            if let Err(e) = file.close() {
                warn!(path = %self.path.display(), error = %e, "Failed to remove upload");
            }
        }
    }
}
