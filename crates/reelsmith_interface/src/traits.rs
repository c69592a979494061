//! Trait definitions for models, storage, rendering and time.

use async_trait::async_trait;
use reelsmith_core::{GeneratedVideo, OperationHandle, OperationStatus, VideoRequest, VisionRequest};
use reelsmith_error::{ReelsmithResult, StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A text/vision model: one instruction and one image in, free text out.
#[async_trait]
pub trait VisionDriver: Send + Sync {
    /// Generate text for the request. The text may or may not be JSON.
    async fn generate(&self, request: &VisionRequest) -> ReelsmithResult<String>;

    /// Provider name (e.g., "vertex-gemini").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gemini-2.5-pro").
    fn model_name(&self) -> &str;
}

/// A video model exposing long-running generation operations.
#[async_trait]
pub trait VideoDriver: Send + Sync {
    /// Submit a generation request.
    async fn submit(&self, request: &VideoRequest) -> ReelsmithResult<OperationHandle>;

    /// Submit an extension of a previously generated video.
    async fn extend(&self, source: &GeneratedVideo) -> ReelsmithResult<OperationHandle>;

    /// Check an operation once.
    async fn poll(&self, operation: &OperationHandle) -> ReelsmithResult<OperationStatus>;

    /// Model identifier.
    fn model_name(&self) -> &str;
}

/// Blob storage addressed by URI.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key` and return the object's URI.
    async fn upload_bytes(&self, bytes: Vec<u8>, key: &str) -> ReelsmithResult<String>;

    /// Upload a local file under `key` and return its URI.
    async fn upload(&self, local_path: &Path, key: &str) -> ReelsmithResult<String> {
        let bytes = tokio::fs::read(local_path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                local_path.display(),
                e
            )))
        })?;
        self.upload_bytes(bytes, key).await
    }

    /// Download the object at `uri` to `local_path`.
    async fn download(&self, uri: &str, local_path: &Path) -> ReelsmithResult<()>;

    /// URIs of all objects whose key starts with `prefix`.
    async fn list(&self, prefix: &str) -> ReelsmithResult<Vec<String>>;

    /// Time-limited read URL for `uri`.
    async fn signed_url(&self, uri: &str, expires_in: Duration) -> ReelsmithResult<String>;

    /// URI an object stored under `key` would have.
    fn uri_for(&self, key: &str) -> String;

    /// Backend name for logging (e.g., "gcs", "filesystem").
    fn backend_name(&self) -> &'static str;
}

/// Straight concatenation of local video files.
#[async_trait]
pub trait ClipConcatenator: Send + Sync {
    /// Concatenate `inputs` in order into `output`.
    ///
    /// Implementations release every resource they opened before
    /// returning, on success and on failure.
    async fn concatenate(&self, inputs: &[PathBuf], output: &Path) -> ReelsmithResult<()>;
}

/// Source of delays, injectable so tests run without real sleeps.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
