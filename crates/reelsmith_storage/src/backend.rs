//! Backend selection from configuration.

use crate::{FileSystemBlobStore, GcsBlobStore};
use reelsmith_config::{StorageBackendKind, StorageConfig};
use reelsmith_error::ReelsmithResult;
use reelsmith_interface::BlobStore;
use std::sync::Arc;

/// Build the blob store named by `config.backend`.
///
/// # Errors
///
/// Returns error if the selected backend cannot be constructed.
pub fn blob_store_from_config(config: &StorageConfig) -> ReelsmithResult<Arc<dyn BlobStore>> {
    let store: Arc<dyn BlobStore> = match config.backend {
        StorageBackendKind::Gcs => Arc::new(GcsBlobStore::new(config.bucket.clone())?),
        StorageBackendKind::Filesystem => {
            Arc::new(FileSystemBlobStore::new(config.local_root.clone())?)
        }
    };
    tracing::debug!(backend = store.backend_name(), "Selected blob store");
    Ok(store)
}
