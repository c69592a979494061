//! Pipeline orchestration error types.

/// Specific error conditions raised by the orchestrator and video generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Request rejected before any work began
    #[display("Invalid input: {}", _0)]
    InvalidInput(String),
    /// Prompt generation produced no directives
    #[display("No segment directives to generate")]
    NoDirectives,
    /// Every segment failed
    #[display("No video segments were generated ({} attempted)", _0)]
    NoSegmentsGenerated(usize),
    /// The base video of extension mode failed
    #[display("Base video generation failed: {}", _0)]
    BaseVideoFailed(String),
}

/// Pipeline error with source location tracking.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::InvalidInput("No images provided".into()));
/// assert!(format!("{}", err).contains("No images provided"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
