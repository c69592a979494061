//! Vertex AI endpoint addressing and JSON transport.

use reelsmith_error::ConfigError;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

/// Environment variable holding the OAuth access token.
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Failure of one Vertex call, before mapping to a client-specific error.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum VertexCallError {
    /// Request never produced a response
    #[display("request failed: {}", _0)]
    Transport(String),
    /// Non-success status
    #[display("HTTP {}: {}", status, body)]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },
    /// Response body did not decode
    #[display("invalid response body: {}", _0)]
    Decode(String),
}

/// Project, region and credentials for Vertex AI publisher models.
#[derive(Clone)]
pub struct VertexEndpoint {
    base_url: String,
    project: String,
    location: String,
    access_token: String,
}

impl std::fmt::Debug for VertexEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexEndpoint")
            .field("base_url", &self.base_url)
            .field("project", &self.project)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl VertexEndpoint {
    /// Create an endpoint with an explicit access token.
    pub fn new(
        project: impl Into<String>,
        location: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        let location = location.into();
        Self {
            base_url: format!("https://{}-aiplatform.googleapis.com", location),
            project: project.into(),
            location,
            access_token: access_token.into(),
        }
    }

    /// Create an endpoint reading the token from [`ACCESS_TOKEN_ENV`].
    ///
    /// # Errors
    ///
    /// Returns error if the project is empty or the token is not set.
    pub fn from_env(
        project: impl Into<String>,
        location: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let project = project.into();
        if project.is_empty() {
            return Err(ConfigError::new(
                "Vertex project is empty (set vertex.project)",
            ));
        }
        let token = std::env::var(ACCESS_TOKEN_ENV).map_err(|_| {
            ConfigError::new(format!("{} environment variable not set", ACCESS_TOKEN_ENV))
        })?;
        Ok(Self::new(project, location, token))
    }

    /// Point requests at another host, such as a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// URL of `method` on a publisher model.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsmith_models::VertexEndpoint;
    ///
    /// let endpoint = VertexEndpoint::new("proj", "us-central1", "token");
    /// assert_eq!(
    ///     endpoint.model_url("gemini-2.5-pro", "generateContent"),
    ///     "https://us-central1-aiplatform.googleapis.com/v1/projects/proj/locations/us-central1/publishers/google/models/gemini-2.5-pro:generateContent"
    /// );
    /// ```
    pub fn model_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:{}",
            self.base_url, self.project, self.location, model, method
        )
    }

    /// POST `body` as JSON and decode the JSON response.
    pub(crate) async fn post_json<B, R>(
        &self,
        client: &Client,
        url: &str,
        body: &B,
    ) -> Result<R, VertexCallError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(url, "Sending Vertex request");

        let response = client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send Vertex request");
                VertexCallError::Transport(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Vertex API returned error");
            return Err(VertexCallError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse Vertex response");
            VertexCallError::Decode(e.to_string())
        })
    }
}
