//! Product images supplied by the caller.

use reelsmith_error::{PromptError, PromptErrorKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// MIME type guessed from a file extension, defaulting to PNG.
///
/// # Examples
///
/// ```
/// use reelsmith_core::mime_type_for;
///
/// assert_eq!(mime_type_for("shot.JPG"), "image/jpeg");
/// assert_eq!(mime_type_for("shot.webp"), "image/webp");
/// assert_eq!(mime_type_for("shot"), "image/png");
/// ```
pub fn mime_type_for(path: impl AsRef<Path>) -> &'static str {
    let extension = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

/// A product photo held in memory.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct ProductImage {
    /// File name used when uploading
    file_name: String,
    /// MIME type
    mime_type: String,
    /// Raw bytes
    bytes: Vec<u8>,
}

impl ProductImage {
    /// Wrap bytes already in memory.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_type_for(&file_name).to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    /// Read an image from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, PromptError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            PromptError::new(PromptErrorKind::ImageRead {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image.png".to_string());
        tracing::debug!(size = bytes.len(), "Loaded product image");
        Ok(Self::new(file_name, bytes))
    }
}

/// An uploaded image the video model can reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
pub struct ImageReference {
    /// Storage URI
    uri: String,
    /// MIME type
    mime_type: String,
}

impl ImageReference {
    /// Create a reference.
    pub fn new(uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: mime_type.into(),
        }
    }
}
