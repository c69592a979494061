//! Gemini client implementation.

use super::dto::ApiErrorEnvelope;
use crate::{
    GeminiContent, GeminiInlineData, GeminiPart, GenerateContentRequest, GenerateContentResponse,
    VertexCallError, VertexEndpoint,
};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reelsmith_core::VisionRequest;
use reelsmith_error::{GeminiError, GeminiErrorKind, ReelsmithResult};
use reelsmith_interface::VisionDriver;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Gemini text/vision model served by Vertex AI.
#[derive(Debug, Clone)]
pub struct VertexGeminiClient {
    client: Client,
    endpoint: VertexEndpoint,
    model: String,
}

impl VertexGeminiClient {
    /// Create a client for `model`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(endpoint: VertexEndpoint, model: impl Into<String>) -> Result<Self, GeminiError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string())))?;
        let model = model.into();
        debug!(model = %model, "Creating Vertex Gemini client");
        Ok(Self {
            client,
            endpoint,
            model,
        })
    }

    /// Build the request body: the instruction followed by the image inline.
    pub fn build_request(request: &VisionRequest) -> GenerateContentRequest {
        let image = request.image();
        let data = STANDARD.encode(image.bytes());
        GenerateContentRequest::new(vec![GeminiContent::user(vec![
            GeminiPart::from_text(request.instruction().clone()),
            GeminiPart::from_inline(GeminiInlineData::new(image.mime_type().clone(), data)),
        ])])
    }

    /// Send a raw `generateContent` request.
    #[instrument(skip(self, body), fields(model = %self.model))]
    pub async fn generate_content(
        &self,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = self.endpoint.model_url(&self.model, "generateContent");
        self.endpoint
            .post_json(&self.client, &url, body)
            .await
            .map_err(classify)
    }
}

/// Map a transport failure to a Gemini error, recognizing unavailability.
fn classify(err: VertexCallError) -> GeminiError {
    match err {
        VertexCallError::Transport(message) => {
            GeminiError::new(GeminiErrorKind::ApiRequest(message))
        }
        VertexCallError::Decode(message) => {
            GeminiError::new(GeminiErrorKind::ResponseParse(message))
        }
        VertexCallError::Status { status, body } => {
            match serde_json::from_str::<ApiErrorEnvelope>(&body) {
                Ok(envelope) if envelope.error.status == "UNAVAILABLE" => {
                    GeminiError::new(GeminiErrorKind::Unavailable(envelope.error.message))
                }
                _ => GeminiError::new(GeminiErrorKind::HttpError {
                    status_code: status,
                    message: body,
                }),
            }
        }
    }
}

#[async_trait]
impl VisionDriver for VertexGeminiClient {
    #[instrument(skip(self, request), fields(model = %self.model, image = %request.image().file_name()))]
    async fn generate(&self, request: &VisionRequest) -> ReelsmithResult<String> {
        let body = Self::build_request(request);
        let response = self.generate_content(&body).await?;
        let text = response
            .first_text()
            .ok_or_else(|| GeminiError::new(GeminiErrorKind::EmptyResponse))?;
        debug!(chars = text.len(), "Received Gemini response");
        Ok(text)
    }

    fn provider_name(&self) -> &'static str {
        "vertex-gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
