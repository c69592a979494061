//! Per-run storage manager.

use reelsmith_core::{ImageReference, ProductImage, RequestContext};
use reelsmith_error::ReelsmithResult;
use reelsmith_interface::BlobStore;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Object name of the merged deliverable inside a run's namespace.
pub const FINAL_VIDEO_NAME: &str = "final_merged_video.mp4";

/// A stored deliverable and its readable URL.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct FinalAsset {
    /// Storage URI
    uri: String,
    /// Time-limited read URL
    signed_url: String,
}

/// Storage scoped to one pipeline run.
///
/// The namespace is generated at construction from the current time and a
/// random suffix, so concurrent runs never share a folder.
#[derive(Clone)]
pub struct StorageManager {
    store: Arc<dyn BlobStore>,
    context: RequestContext,
    signed_url_ttl: Duration,
}

impl std::fmt::Debug for StorageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageManager")
            .field("backend", &self.store.backend_name())
            .field("context", &self.context)
            .field("signed_url_ttl", &self.signed_url_ttl)
            .finish()
    }
}

impl StorageManager {
    /// Create a manager with a freshly generated namespace under `output_prefix`.
    pub fn new(store: Arc<dyn BlobStore>, output_prefix: &str, signed_url_ttl: Duration) -> Self {
        Self::with_context(store, RequestContext::generate(output_prefix), signed_url_ttl)
    }

    /// Create a manager around an existing context.
    pub fn with_context(
        store: Arc<dyn BlobStore>,
        context: RequestContext,
        signed_url_ttl: Duration,
    ) -> Self {
        tracing::info!(
            request_id = %context.request_id(),
            namespace = %context.asset_namespace(),
            backend = store.backend_name(),
            "Storage manager ready"
        );
        Self {
            store,
            context,
            signed_url_ttl,
        }
    }

    /// The run's identity.
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Upload a local file into the namespace root, keeping its file name.
    pub async fn upload(&self, local_path: &Path) -> ReelsmithResult<String> {
        let file_name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload.bin".to_string());
        let key = format!("{}/{}", self.context.asset_namespace(), file_name);
        self.store.upload(local_path, &key).await
    }

    /// Upload a product image into `input_images/`.
    #[tracing::instrument(skip(self, image), fields(file = %image.file_name()))]
    pub async fn upload_image(&self, image: &ProductImage) -> ReelsmithResult<ImageReference> {
        let key = format!(
            "{}/{}",
            self.context.input_images_folder(),
            image.file_name()
        );
        let uri = self.store.upload_bytes(image.bytes().clone(), &key).await?;
        tracing::info!(uri = %uri, "Uploaded product image");
        Ok(ImageReference::new(uri, image.mime_type().clone()))
    }

    /// Download the object at `uri` to `local_path`.
    pub async fn download(&self, uri: &str, local_path: &Path) -> ReelsmithResult<()> {
        self.store.download(uri, local_path).await
    }

    /// URIs under `prefix`, sorted.
    pub async fn list(&self, prefix: &str) -> ReelsmithResult<Vec<String>> {
        self.store.list(prefix).await
    }

    /// Where the video model should write segment `segment_number`.
    ///
    /// `segment_{NN}_{start}-{end}s.mp4` with two-digit fields.
    pub fn segment_output_uri(&self, segment_number: u32, start: u32, end: u32) -> String {
        let key = format!(
            "{}/segment_{:02}_{:02}-{:02}s.mp4",
            self.context.segments_folder(),
            segment_number,
            start,
            end
        );
        self.store.uri_for(&key)
    }

    /// Generated segment videos of this run, sorted by name.
    pub async fn list_segments(&self) -> ReelsmithResult<Vec<String>> {
        let mut segments: Vec<String> = self
            .store
            .list(&format!("{}/", self.context.segments_folder()))
            .await?
            .into_iter()
            .filter(|uri| uri.ends_with(".mp4"))
            .collect();
        segments.sort();
        Ok(segments)
    }

    /// Upload the merged deliverable and sign a read URL for it.
    #[tracing::instrument(skip(self, local_path), fields(local = %local_path.display()))]
    pub async fn upload_final(&self, local_path: &Path) -> ReelsmithResult<FinalAsset> {
        let key = format!("{}/{}", self.context.asset_namespace(), FINAL_VIDEO_NAME);
        let uri = self.store.upload(local_path, &key).await?;
        let signed_url = self.signed_url(&uri).await?;
        tracing::info!(uri = %uri, "Uploaded final video");
        Ok(FinalAsset { uri, signed_url })
    }

    /// Time-limited read URL for `uri`.
    pub async fn signed_url(&self, uri: &str) -> ReelsmithResult<String> {
        self.store.signed_url(uri, self.signed_url_ttl).await
    }
}
