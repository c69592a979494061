//! Video merge error types.

/// Specific error conditions for merging segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum MergeErrorKind {
    /// Nothing to merge
    #[display("No video segments to merge")]
    NoSegments,
    /// A segment could not be fetched to local disk
    #[display("Failed to download segment {}: {}", uri, message)]
    Download {
        /// Source URI
        uri: String,
        /// Underlying error
        message: String,
    },
    /// The concatenation tool could not be started
    #[display("Failed to launch concatenator: {}", _0)]
    Launch(String),
    /// The concatenation tool ran and failed
    #[display("Render failed: {}", _0)]
    Render(String),
    /// Local file manipulation failed
    #[display("Local file error: {}", _0)]
    Io(String),
    /// The rendered file could not be uploaded
    #[display("Failed to upload merged video: {}", _0)]
    Upload(String),
}

/// Merge error with source location tracking.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{MergeError, MergeErrorKind};
///
/// let err = MergeError::new(MergeErrorKind::NoSegments);
/// assert!(format!("{}", err).contains("No video segments"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Merge Error: {} at line {} in {}", kind, line, file)]
pub struct MergeError {
    /// The specific error condition
    pub kind: MergeErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl MergeError {
    /// Create a new MergeError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: MergeErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
