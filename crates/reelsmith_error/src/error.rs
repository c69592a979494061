//! Top-level error wrapper types.

use crate::{
    ConfigError, GeminiError, HttpError, JsonError, MergeError, PipelineError, PromptError,
    StorageError, VeoError,
};

/// Every error a Reelsmith component can raise.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{ReelsmithError, HttpError};
///
/// let err: ReelsmithError = HttpError::new("Connection failed").into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ReelsmithErrorKind {
    /// HTTP transport error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Blob storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Text/vision model error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Video model error
    #[from(VeoError)]
    Veo(VeoError),
    /// Prompt generation error
    #[from(PromptError)]
    Prompt(PromptError),
    /// Merge error
    #[from(MergeError)]
    Merge(MergeError),
    /// Orchestration error
    #[from(PipelineError)]
    Pipeline(PipelineError),
}

/// Reelsmith error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Reelsmith Error: {}", _0)]
pub struct ReelsmithError(Box<ReelsmithErrorKind>);

impl ReelsmithError {
    /// Create a new error from a kind.
    pub fn new(kind: ReelsmithErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ReelsmithErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to ReelsmithErrorKind
impl<T> From<T> for ReelsmithError
where
    T: Into<ReelsmithErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Reelsmith operations.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{ReelsmithResult, ConfigError};
///
/// fn load() -> ReelsmithResult<()> {
///     Err(ConfigError::new("Missing bucket"))?
/// }
///
/// assert!(load().is_err());
/// ```
pub type ReelsmithResult<T> = std::result::Result<T, ReelsmithError>;
