//! Filesystem-backed blob store.
//!
//! Objects live at `{root}/{key}` and are addressed as `file://{root}/{key}`.
//! There is no access control to sign, so signed URLs are the plain file URI.

use async_trait::async_trait;
use reelsmith_error::{ReelsmithResult, StorageError, StorageErrorKind};
use reelsmith_interface::BlobStore;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

const SCHEME: &str = "file://";

/// Filesystem storage backend.
///
/// # Example Structure
///
/// ```text
/// /var/reelsmith/
/// └── veo-product-videos/
///     └── 1700000000_ab12cd34/
///         ├── input_images/
///         │   └── bottle.png
///         └── segments/
///             └── segment_01_00-08s.mp4
/// ```
///
/// Writes go to a temp file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileSystemBlobStore {
    root: PathBuf,
}

impl FileSystemBlobStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or resolved.
    #[tracing::instrument(skip(root))]
    pub fn new(root: impl Into<PathBuf>) -> ReelsmithResult<Self> {
        let root = root.into();

        std::fs::create_dir_all(&root).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                root.display(),
                e
            )))
        })?;
        let root = std::path::absolute(&root).map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidConfig(format!(
                "{}: {}",
                root.display(),
                e
            )))
        })?;

        tracing::info!(path = %root.display(), "Created filesystem blob store");
        Ok(Self { root })
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        key.split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |path, part| path.join(part))
    }

    /// Path for `key`, rejecting keys that would leave the root.
    fn checked_path_for(&self, key: &str) -> ReelsmithResult<PathBuf> {
        if key.split('/').any(|part| part == ".." || part == ".") {
            return Err(StorageError::new(StorageErrorKind::InvalidUri(format!(
                "key {} contains relative segments",
                key
            )))
            .into());
        }
        Ok(self.path_for(key))
    }

    fn path_from_uri(&self, uri: &str) -> ReelsmithResult<PathBuf> {
        let path = uri
            .strip_prefix(SCHEME)
            .map(PathBuf::from)
            .ok_or_else(|| StorageError::new(StorageErrorKind::InvalidUri(uri.to_string())))?;
        let inside = path
            .strip_prefix(&self.root)
            .is_ok_and(|rest| rest.components().all(|c| matches!(c, Component::Normal(_))));
        if !inside {
            return Err(StorageError::new(StorageErrorKind::InvalidUri(format!(
                "{} is outside {}",
                uri,
                self.root.display()
            )))
            .into());
        }
        Ok(path)
    }

    fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();
        Some(parts.join("/"))
    }

    async fn walk(&self) -> ReelsmithResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await.map_err(|e| {
                StorageError::new(StorageErrorKind::List(format!("{}: {}", dir.display(), e)))
            })?;
            while let Some(entry) = entries.next_entry().await.map_err(|e| {
                StorageError::new(StorageErrorKind::List(format!("{}: {}", dir.display(), e)))
            })? {
                let path = entry.path();
                let file_type = entry.file_type().await.map_err(|e| {
                    StorageError::new(StorageErrorKind::List(format!(
                        "{}: {}",
                        path.display(),
                        e
                    )))
                })?;
                if file_type.is_dir() {
                    pending.push(path);
                } else if path.extension().is_none_or(|ext| ext != "tmp") {
                    files.push(path);
                }
            }
        }
        Ok(files)
    }
}

#[async_trait]
impl BlobStore for FileSystemBlobStore {
    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload_bytes(&self, bytes: Vec<u8>, key: &str) -> ReelsmithResult<String> {
        let path = self.checked_path_for(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &bytes).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::info!(path = %path.display(), size = bytes.len(), "Stored object");
        Ok(self.uri_for(key))
    }

    #[tracing::instrument(skip(self, local_path), fields(local = %local_path.display()))]
    async fn download(&self, uri: &str, local_path: &Path) -> ReelsmithResult<()> {
        let path = self.path_from_uri(uri)?;

        tokio::fs::copy(&path, local_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(uri.to_string()))
            } else {
                StorageError::new(StorageErrorKind::Download(format!("{}: {}", uri, e)))
            }
        })?;

        tracing::debug!(uri, "Downloaded object");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn list(&self, prefix: &str) -> ReelsmithResult<Vec<String>> {
        let mut uris: Vec<String> = self
            .walk()
            .await?
            .iter()
            .filter_map(|path| self.key_for(path))
            .filter(|key| key.starts_with(prefix))
            .map(|key| self.uri_for(&key))
            .collect();
        uris.sort();

        tracing::debug!(count = uris.len(), "Listed objects");
        Ok(uris)
    }

    async fn signed_url(&self, uri: &str, _expires_in: Duration) -> ReelsmithResult<String> {
        let path = self.path_from_uri(uri)?;
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::new(StorageErrorKind::NotFound(uri.to_string())).into());
        }
        Ok(uri.to_string())
    }

    fn uri_for(&self, key: &str) -> String {
        format!("{}{}", SCHEME, self.path_for(key).display())
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}
