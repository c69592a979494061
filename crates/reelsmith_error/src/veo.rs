//! Video model error types.

/// Specific error conditions for the Veo video client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum VeoErrorKind {
    /// Failed to build the HTTP client
    #[display("Failed to create Veo client: {}", _0)]
    ClientCreation(String),
    /// Request could not be sent
    #[display("Veo API request failed: {}", _0)]
    ApiRequest(String),
    /// Non-success HTTP status with the response body
    #[display("HTTP {} error: {}", status_code, message)]
    HttpError {
        /// HTTP status code
        status_code: u16,
        /// Response body or error message
        message: String,
    },
    /// Response body did not have the expected shape
    #[display("Failed to parse Veo response: {}", _0)]
    ResponseParse(String),
}

/// Veo error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Veo Error: {} at line {} in {}", kind, line, file)]
pub struct VeoError {
    /// The specific error condition
    pub kind: VeoErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl VeoError {
    /// Create a new VeoError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: VeoErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
