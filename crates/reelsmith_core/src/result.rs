//! Externally visible pipeline outcome.

use serde::{Deserialize, Serialize};

/// Uniform two-shape result returned by the orchestrator.
///
/// Serializes as `{asset_url, request_id, segment_count, duration}` or
/// `{error}`.
///
/// # Examples
///
/// ```
/// use reelsmith_core::PipelineResult;
///
/// let failure = PipelineResult::failure("No images provided");
/// let json = serde_json::to_value(&failure).unwrap();
/// assert_eq!(json["error"], "No images provided");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PipelineResult {
    /// The run produced a deliverable
    Success {
        /// Readable URL of the final asset
        asset_url: String,
        /// Identifier of the run
        request_id: String,
        /// Number of segments in the deliverable
        segment_count: usize,
        /// Length of the deliverable in seconds
        duration: u32,
    },
    /// The run failed at some stage
    Failure {
        /// Human readable reason
        #[serde(rename = "error")]
        error_message: String,
    },
}

impl PipelineResult {
    /// Build a failure result.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            error_message: message.into(),
        }
    }

    /// True for [`PipelineResult::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
