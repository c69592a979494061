//! Google Cloud Storage blob store.

use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use http::Method;
use object_store::gcp::{GoogleCloudStorage, GoogleCloudStorageBuilder};
use object_store::path::Path as ObjectPath;
use object_store::signer::Signer;
use object_store::{ObjectStore, PutPayload};
use reelsmith_error::{ReelsmithResult, StorageError, StorageErrorKind};
use reelsmith_interface::BlobStore;
use std::path::Path;
use std::time::Duration;

/// Blob store over a single GCS bucket, addressed as `gs://{bucket}/{key}`.
///
/// Credentials are resolved by `object_store` from the environment
/// (`GOOGLE_SERVICE_ACCOUNT`, `GOOGLE_APPLICATION_CREDENTIALS`, or the
/// metadata server).
#[derive(Debug)]
pub struct GcsBlobStore {
    store: GoogleCloudStorage,
    bucket: String,
}

impl GcsBlobStore {
    /// Create a store for `bucket`.
    ///
    /// # Errors
    ///
    /// Returns error if the bucket name is empty or credentials cannot be resolved.
    pub fn new(bucket: impl Into<String>) -> ReelsmithResult<Self> {
        let bucket = bucket.into();
        if bucket.is_empty() {
            return Err(StorageError::new(StorageErrorKind::InvalidConfig(
                "GCS bucket name is empty (set storage.bucket)".to_string(),
            ))
            .into());
        }

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(&bucket)
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, bucket = %bucket, "Failed to build GCS client");
                StorageError::new(StorageErrorKind::InvalidConfig(e.to_string()))
            })?;

        tracing::info!(bucket = %bucket, "Created GCS blob store");
        Ok(Self { store, bucket })
    }

    /// Bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn location_for(&self, uri: &str) -> ReelsmithResult<ObjectPath> {
        let prefix = format!("gs://{}/", self.bucket);
        uri.strip_prefix(&prefix)
            .filter(|key| !key.is_empty())
            .map(ObjectPath::from)
            .ok_or_else(|| StorageError::new(StorageErrorKind::InvalidUri(uri.to_string())).into())
    }
}

#[async_trait]
impl BlobStore for GcsBlobStore {
    #[tracing::instrument(skip(self, bytes), fields(bucket = %self.bucket, size = bytes.len()))]
    async fn upload_bytes(&self, bytes: Vec<u8>, key: &str) -> ReelsmithResult<String> {
        let location = ObjectPath::from(key);
        let size = bytes.len();
        let start = std::time::Instant::now();

        self.store
            .put(&location, PutPayload::from(Bytes::from(bytes)))
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "GCS upload failed"
                );
                StorageError::new(StorageErrorKind::Upload(format!("{}: {}", key, e)))
            })?;

        tracing::info!(
            key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "GCS upload successful"
        );
        Ok(self.uri_for(key))
    }

    #[tracing::instrument(skip(self, local_path), fields(bucket = %self.bucket, local = %local_path.display()))]
    async fn download(&self, uri: &str, local_path: &Path) -> ReelsmithResult<()> {
        let location = self.location_for(uri)?;

        let data = self
            .store
            .get(&location)
            .await
            .map_err(|e| match e {
                object_store::Error::NotFound { .. } => {
                    StorageError::new(StorageErrorKind::NotFound(uri.to_string()))
                }
                other => StorageError::new(StorageErrorKind::Download(format!(
                    "{}: {}",
                    uri, other
                ))),
            })?
            .bytes()
            .await
            .map_err(|e| StorageError::new(StorageErrorKind::Download(format!("{}: {}", uri, e))))?;

        tokio::fs::write(local_path, &data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                local_path.display(),
                e
            )))
        })?;

        tracing::debug!(size_bytes = data.len(), "GCS download successful");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.bucket))]
    async fn list(&self, prefix: &str) -> ReelsmithResult<Vec<String>> {
        let location = ObjectPath::from(prefix);
        let objects: Vec<_> = self
            .store
            .list(Some(&location))
            .try_collect()
            .await
            .map_err(|e| StorageError::new(StorageErrorKind::List(format!("{}: {}", prefix, e))))?;

        let mut uris: Vec<String> = objects
            .iter()
            .map(|meta| self.uri_for(meta.location.as_ref()))
            .collect();
        uris.sort();

        tracing::debug!(count = uris.len(), "Listed objects");
        Ok(uris)
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.bucket))]
    async fn signed_url(&self, uri: &str, expires_in: Duration) -> ReelsmithResult<String> {
        let location = self.location_for(uri)?;
        let url = self
            .store
            .signed_url(Method::GET, &location, expires_in)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, uri, "Failed to sign URL");
                StorageError::new(StorageErrorKind::Signing(e.to_string()))
            })?;
        Ok(url.to_string())
    }

    fn uri_for(&self, key: &str) -> String {
        format!("gs://{}/{}", self.bucket, key.trim_start_matches('/'))
    }

    fn backend_name(&self) -> &'static str {
        "gcs"
    }
}
