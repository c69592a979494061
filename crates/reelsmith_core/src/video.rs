//! Request and operation types for the model drivers.

use crate::{ImageReference, ProductImage};
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// One call to the text/vision model: an instruction plus one image.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct VisionRequest {
    /// Instruction text
    instruction: String,
    /// Image sent alongside the instruction
    image: ProductImage,
}

impl VisionRequest {
    /// Create a request.
    pub fn new(instruction: impl Into<String>, image: ProductImage) -> Self {
        Self {
            instruction: instruction.into(),
            image,
        }
    }
}

/// A video generation submission.
///
/// # Examples
///
/// ```
/// use reelsmith_core::VideoRequest;
///
/// let request = VideoRequest::builder()
///     .prompt("A perfume bottle on wet sand")
///     .duration_seconds(8u32)
///     .aspect_ratio("16:9")
///     .resolution("720p")
///     .person_generation("disabled")
///     .output_uri("gs://bucket/run/segments/segment_01_00-08s.mp4")
///     .build()
///     .unwrap();
/// assert!(request.image().is_none());
/// assert!(!request.generate_audio());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct VideoRequest {
    /// Directive payload
    prompt: String,
    /// Reference image
    #[builder(default)]
    image: Option<ImageReference>,
    /// Target length in seconds
    duration_seconds: u32,
    /// Aspect ratio such as `16:9`
    aspect_ratio: String,
    /// Resolution such as `720p`
    resolution: String,
    /// Whether the model should synthesize audio
    #[builder(default = "false")]
    generate_audio: bool,
    /// `disabled` or `allow_adult`
    person_generation: String,
    /// Storage location the model writes to
    output_uri: String,
}

impl VideoRequest {
    /// Creates a new builder for `VideoRequest`.
    pub fn builder() -> VideoRequestBuilder {
        VideoRequestBuilder::default()
    }
}

/// A video produced by the model, usable as an extension source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct GeneratedVideo {
    /// Storage URI
    uri: String,
    /// MIME type
    mime_type: String,
}

impl GeneratedVideo {
    /// Create a video handle.
    pub fn new(uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// Long-running operation returned on submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct OperationHandle {
    /// Operation resource name
    name: String,
    /// Model the operation runs on
    model: String,
}

impl OperationHandle {
    /// Create a handle.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Status reported by one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    /// Still running
    Pending,
    /// Finished with a video
    Succeeded(GeneratedVideo),
    /// Finished with an error
    Failed {
        /// Error code, if reported
        code: Option<i64>,
        /// Error message
        message: String,
    },
}
