//! Results of realizing one directive.

use serde::{Deserialize, Serialize};

/// Outcome of a single segment generation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SegmentStatus {
    /// Video produced and stored
    Success,
    /// Every attempt failed
    Failed,
}

/// Result of invoking the video API for one directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct GeneratedSegment {
    /// Position of the originating directive
    segment_number: u32,
    /// Storage URI of the produced video (empty when failed)
    asset_reference: String,
    /// Outcome
    status: SegmentStatus,
}

impl GeneratedSegment {
    /// A segment whose video is available at `asset_reference`.
    pub fn succeeded(segment_number: u32, asset_reference: impl Into<String>) -> Self {
        Self {
            segment_number,
            asset_reference: asset_reference.into(),
            status: SegmentStatus::Success,
        }
    }

    /// A segment that exhausted its attempts.
    pub fn failed(segment_number: u32) -> Self {
        Self {
            segment_number,
            asset_reference: String::new(),
            status: SegmentStatus::Failed,
        }
    }

    /// True when the segment produced a video.
    pub fn is_success(&self) -> bool {
        self.status == SegmentStatus::Success
    }
}
