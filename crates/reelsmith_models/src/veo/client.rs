//! Veo client implementation.

use super::dto::{FetchOperationRequest, OperationName};
use crate::{
    GcsMedia, PredictInstance, PredictOperation, PredictParameters, PredictRequest,
    VertexCallError, VertexEndpoint,
};
use async_trait::async_trait;
use reelsmith_core::{GeneratedVideo, OperationHandle, OperationStatus, VideoRequest};
use reelsmith_error::{ReelsmithResult, VeoError, VeoErrorKind};
use reelsmith_interface::VideoDriver;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, instrument};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Folder an extension of `source_uri` is written to.
///
/// Extensions land in an `extensions/` folder beside the source video.
///
/// # Examples
///
/// ```
/// use reelsmith_models::extension_output_prefix;
///
/// assert_eq!(
///     extension_output_prefix("gs://b/run/segments/base/sample_0.mp4"),
///     "gs://b/run/segments/base/extensions/"
/// );
/// ```
pub fn extension_output_prefix(source_uri: &str) -> String {
    match source_uri.rsplit_once('/') {
        Some((parent, _)) if !parent.ends_with(':') && !parent.ends_with('/') => {
            format!("{}/extensions/", parent)
        }
        _ => format!("{}/extensions/", source_uri.trim_end_matches('/')),
    }
}

/// Veo video model served by Vertex AI.
#[derive(Debug, Clone)]
pub struct VertexVeoClient {
    client: Client,
    endpoint: VertexEndpoint,
    model: String,
    extension_model: String,
}

impl VertexVeoClient {
    /// Create a client using `model` for generation and `extension_model` for extensions.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(
        endpoint: VertexEndpoint,
        model: impl Into<String>,
        extension_model: impl Into<String>,
    ) -> Result<Self, VeoError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| VeoError::new(VeoErrorKind::ClientCreation(e.to_string())))?;
        let model = model.into();
        debug!(model = %model, "Creating Vertex Veo client");
        Ok(Self {
            client,
            endpoint,
            model,
            extension_model: extension_model.into(),
        })
    }

    /// Build the `predictLongRunning` body for a generation request.
    pub fn build_request(request: &VideoRequest) -> Result<PredictRequest, VeoError> {
        let image = request
            .image()
            .as_ref()
            .map(|image| GcsMedia::new(image.uri().clone(), image.mime_type().clone()));
        let parameters = PredictParameters::builder()
            .aspect_ratio(request.aspect_ratio().clone())
            .duration_seconds(*request.duration_seconds())
            .resolution(request.resolution().clone())
            .person_generation(request.person_generation().clone())
            .generate_audio(*request.generate_audio())
            .storage_uri(request.output_uri().clone())
            .build()
            .map_err(|e| VeoError::new(VeoErrorKind::ApiRequest(e.to_string())))?;
        Ok(PredictRequest::new(
            PredictInstance::generation(request.prompt().clone(), image),
            parameters,
        ))
    }

    /// Build the `predictLongRunning` body for an extension.
    pub fn build_extension_request(source: &GeneratedVideo) -> Result<PredictRequest, VeoError> {
        let parameters = PredictParameters::builder()
            .storage_uri(extension_output_prefix(source.uri()))
            .build()
            .map_err(|e| VeoError::new(VeoErrorKind::ApiRequest(e.to_string())))?;
        Ok(PredictRequest::new(
            PredictInstance::extension(GcsMedia::new(
                source.uri().clone(),
                source.mime_type().clone(),
            )),
            parameters,
        ))
    }

    async fn start(&self, model: &str, body: &PredictRequest) -> Result<OperationHandle, VeoError> {
        let url = self.endpoint.model_url(model, "predictLongRunning");
        let operation: OperationName = self
            .endpoint
            .post_json(&self.client, &url, body)
            .await
            .map_err(to_veo_error)?;
        info!(operation = %operation.name, model, "Submitted video operation");
        Ok(OperationHandle::new(operation.name, model))
    }

    /// Fetch the raw operation.
    #[instrument(skip(self), fields(operation = %operation.name()))]
    pub async fn fetch_operation(
        &self,
        operation: &OperationHandle,
    ) -> Result<PredictOperation, VeoError> {
        let url = self
            .endpoint
            .model_url(operation.model(), "fetchPredictOperation");
        let body = FetchOperationRequest {
            operation_name: operation.name(),
        };
        self.endpoint
            .post_json(&self.client, &url, &body)
            .await
            .map_err(to_veo_error)
    }
}

fn to_veo_error(err: VertexCallError) -> VeoError {
    match err {
        VertexCallError::Transport(message) => VeoError::new(VeoErrorKind::ApiRequest(message)),
        VertexCallError::Decode(message) => VeoError::new(VeoErrorKind::ResponseParse(message)),
        VertexCallError::Status { status, body } => VeoError::new(VeoErrorKind::HttpError {
            status_code: status,
            message: body,
        }),
    }
}

#[async_trait]
impl VideoDriver for VertexVeoClient {
    #[instrument(skip(self, request), fields(model = %self.model, duration = request.duration_seconds()))]
    async fn submit(&self, request: &VideoRequest) -> ReelsmithResult<OperationHandle> {
        let body = Self::build_request(request)?;
        Ok(self.start(&self.model, &body).await?)
    }

    #[instrument(skip(self, source), fields(model = %self.extension_model, source = %source.uri()))]
    async fn extend(&self, source: &GeneratedVideo) -> ReelsmithResult<OperationHandle> {
        let body = Self::build_extension_request(source)?;
        Ok(self.start(&self.extension_model, &body).await?)
    }

    async fn poll(&self, operation: &OperationHandle) -> ReelsmithResult<OperationStatus> {
        let status = self.fetch_operation(operation).await?.status();
        debug!(operation = %operation.name(), status = ?status, "Polled video operation");
        Ok(status)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
