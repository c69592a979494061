//! Vertex AI `predictLongRunning` data transfer objects.

use derive_builder::Builder;
use derive_getters::Getters;
use reelsmith_core::{GeneratedVideo, OperationStatus};
use serde::{Deserialize, Serialize};

/// A Cloud Storage media reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GcsMedia {
    /// `gs://` URI
    gcs_uri: String,
    /// MIME type
    mime_type: String,
}

impl GcsMedia {
    /// Create a reference.
    pub fn new(gcs_uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            gcs_uri: gcs_uri.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// One generation instance.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct PredictInstance {
    /// Text prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prompt: Option<String>,
    /// Reference image for image-to-video
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<GcsMedia>,
    /// Source video for extension
    #[serde(default, skip_serializing_if = "Option::is_none")]
    video: Option<GcsMedia>,
}

impl PredictInstance {
    /// Image-to-video instance.
    pub fn generation(prompt: impl Into<String>, image: Option<GcsMedia>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            image,
            video: None,
        }
    }

    /// Extension instance.
    pub fn extension(video: GcsMedia) -> Self {
        Self {
            prompt: None,
            image: None,
            video: Some(video),
        }
    }
}

/// Generation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into, strip_option))]
#[serde(rename_all = "camelCase")]
pub struct PredictParameters {
    /// Aspect ratio such as `16:9`
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<String>,
    /// Target length in seconds
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration_seconds: Option<u32>,
    /// Resolution such as `720p`
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resolution: Option<String>,
    /// `disabled` or `allow_adult`
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    person_generation: Option<String>,
    /// Audio synthesis toggle
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    generate_audio: Option<bool>,
    /// Output location prefix
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    storage_uri: Option<String>,
    /// Videos per instance
    #[builder(default = "1")]
    sample_count: u32,
}

impl PredictParameters {
    /// Creates a new builder for `PredictParameters`.
    pub fn builder() -> PredictParametersBuilder {
        PredictParametersBuilder::default()
    }
}

/// Request body of `predictLongRunning`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PredictRequest {
    /// Instances, one per video
    instances: Vec<PredictInstance>,
    /// Shared parameters
    parameters: PredictParameters,
}

impl PredictRequest {
    /// Create a single-instance request.
    pub fn new(instance: PredictInstance, parameters: PredictParameters) -> Self {
        Self {
            instances: vec![instance],
            parameters,
        }
    }
}

/// Response of `predictLongRunning`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OperationName {
    pub(crate) name: String,
}

/// Request body of `fetchPredictOperation`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FetchOperationRequest<'a> {
    pub(crate) operation_name: &'a str,
}

/// Error status inside an operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct OperationError {
    /// Status code
    #[serde(default)]
    code: Option<i64>,
    /// Message
    #[serde(default)]
    message: String,
}

/// One produced video.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct OperationVideo {
    /// Location when written to Cloud Storage
    #[serde(default)]
    gcs_uri: Option<String>,
    /// MIME type
    #[serde(default)]
    mime_type: Option<String>,
    /// Inline payload when no storage URI was requested
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
}

/// Result payload of a finished operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    /// Produced videos
    #[serde(default)]
    videos: Vec<OperationVideo>,
    /// Videos removed by safety filters
    #[serde(default)]
    rai_media_filtered_count: Option<u32>,
    /// Reasons for filtering
    #[serde(default)]
    rai_media_filtered_reasons: Vec<String>,
}

/// A long-running operation as returned by `fetchPredictOperation`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct PredictOperation {
    /// Operation resource name
    #[serde(default)]
    name: String,
    /// Completion flag
    #[serde(default)]
    done: bool,
    /// Result when finished successfully
    #[serde(default)]
    response: Option<OperationResult>,
    /// Error when finished unsuccessfully
    #[serde(default)]
    error: Option<OperationError>,
}

impl PredictOperation {
    /// Interpret the operation as a poll outcome.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsmith_core::OperationStatus;
    /// use reelsmith_models::PredictOperation;
    ///
    /// let op: PredictOperation = serde_json::from_str(r#"{"name":"ops/1","done":false}"#).unwrap();
    /// assert_eq!(op.status(), OperationStatus::Pending);
    /// ```
    pub fn status(&self) -> OperationStatus {
        if let Some(error) = &self.error {
            return OperationStatus::Failed {
                code: error.code,
                message: error.message.clone(),
            };
        }
        if !self.done {
            return OperationStatus::Pending;
        }

        let Some(result) = &self.response else {
            return OperationStatus::Failed {
                code: None,
                message: format!("operation {} finished without a response", self.name),
            };
        };

        if let Some(video) = result.videos.iter().find(|v| v.gcs_uri.is_some()) {
            let uri = video.gcs_uri.clone().unwrap_or_default();
            let mime_type = video
                .mime_type
                .clone()
                .unwrap_or_else(|| "video/mp4".to_string());
            return OperationStatus::Succeeded(GeneratedVideo::new(uri, mime_type));
        }

        let message = if result.videos.iter().any(|v| v.bytes_base64_encoded.is_some()) {
            "video returned inline; a storage URI is required".to_string()
        } else if result.rai_media_filtered_count.unwrap_or(0) > 0 {
            format!(
                "all videos filtered by safety policy: {}",
                result.rai_media_filtered_reasons.join("; ")
            )
        } else {
            "operation finished without a video".to_string()
        };
        OperationStatus::Failed {
            code: None,
            message,
        }
    }
}
