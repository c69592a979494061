//! Text/vision model error types and retry classification.

/// Specific error conditions for the Gemini text/vision client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GeminiErrorKind {
    /// Failed to build the HTTP client
    #[display("Failed to create Gemini client: {}", _0)]
    ClientCreation(String),
    /// Request could not be sent
    #[display("Gemini API request failed: {}", _0)]
    ApiRequest(String),
    /// Non-success HTTP status with the response body
    #[display("HTTP {} error: {}", status_code, message)]
    HttpError {
        /// HTTP status code
        status_code: u16,
        /// Response body or error message
        message: String,
    },
    /// The service reported itself unavailable in the error payload
    #[display("Gemini service unavailable: {}", _0)]
    Unavailable(String),
    /// Response body did not have the expected shape
    #[display("Failed to parse Gemini response: {}", _0)]
    ResponseParse(String),
    /// The model answered with no text
    #[display("Gemini returned an empty response")]
    EmptyResponse,
}

impl GeminiErrorKind {
    /// Check if this error should trigger a retry.
    ///
    /// Only the explicit unavailable signal is retried: HTTP 503 or an
    /// `UNAVAILABLE` status in the error payload.
    pub fn is_retryable(&self) -> bool {
        match self {
            GeminiErrorKind::HttpError {
                status_code,
                message,
            } => *status_code == 503 || message.contains("UNAVAILABLE"),
            GeminiErrorKind::Unavailable(_) => true,
            GeminiErrorKind::EmptyResponse => true,
            _ => false,
        }
    }
}

/// Gemini error with source location tracking.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{GeminiError, GeminiErrorKind, RetryableError};
///
/// let err = GeminiError::new(GeminiErrorKind::HttpError {
///     status_code: 503,
///     message: "overloaded".to_string(),
/// });
/// assert!(err.is_retryable());
///
/// let err = GeminiError::new(GeminiErrorKind::HttpError {
///     status_code: 400,
///     message: "bad request".to_string(),
/// });
/// assert!(!err.is_retryable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gemini Error: {} at line {} in {}", kind, line, file)]
pub struct GeminiError {
    /// The specific error condition
    pub kind: GeminiErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl GeminiError {
    /// Create a new GeminiError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GeminiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Trait for errors that can be classified as retryable.
pub trait RetryableError {
    /// Returns true if the operation may succeed when repeated.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for GeminiError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
