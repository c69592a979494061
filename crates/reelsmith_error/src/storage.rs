//! Blob storage error types.

/// Specific error conditions for storage operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create a directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write a local file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read a local file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Object does not exist
    #[display("Object not found: {}", _0)]
    NotFound(String),
    /// URI does not belong to this store or is malformed
    #[display("Invalid storage URI: {}", _0)]
    InvalidUri(String),
    /// Upload to the object store failed
    #[display("Upload failed: {}", _0)]
    Upload(String),
    /// Download from the object store failed
    #[display("Download failed: {}", _0)]
    Download(String),
    /// Listing a prefix failed
    #[display("List failed: {}", _0)]
    List(String),
    /// Signed URL generation failed
    #[display("Failed to sign URL: {}", _0)]
    Signing(String),
    /// Backend could not be constructed
    #[display("Invalid configuration: {}", _0)]
    InvalidConfig(String),
}

/// Storage error with source location tracking.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound("gs://bucket/a.mp4".to_string()));
/// assert!(format!("{}", err).contains("gs://bucket/a.mp4"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The specific error condition
    pub kind: StorageErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StorageError {
    /// Create a new StorageError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
