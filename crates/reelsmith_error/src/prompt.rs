//! Prompt generation error types.

/// Specific error conditions for prompt generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PromptErrorKind {
    /// Durations do not describe a whole number of segments
    #[display("Invalid durations: total {} s, segment {} s", total, segment)]
    InvalidDurations {
        /// Requested total duration in seconds
        total: u32,
        /// Requested segment duration in seconds
        segment: u32,
    },
    /// Image could not be read
    #[display("Failed to read image {}: {}", path, message)]
    ImageRead {
        /// Image path
        path: String,
        /// Underlying error
        message: String,
    },
    /// Model kept answering with nothing
    #[display("Model returned an empty response after {} attempts", _0)]
    EmptyAfterRetries(u32),
    /// Model stayed unavailable for every attempt
    #[display("Model unavailable after {} attempts: {}", attempts, message)]
    UnavailableAfterRetries {
        /// Attempts made
        attempts: u32,
        /// Last error
        message: String,
    },
}

/// Prompt generation error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Prompt Error: {} at line {} in {}", kind, line, file)]
pub struct PromptError {
    /// The specific error condition
    pub kind: PromptErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PromptError {
    /// Create a new PromptError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PromptErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
