//! Vertex AI model clients for Reelsmith.
//!
//! - [`VertexGeminiClient`] implements [`reelsmith_interface::VisionDriver`]
//!   over the `generateContent` endpoint, sending the instruction and one
//!   inline image.
//! - [`VertexVeoClient`] implements [`reelsmith_interface::VideoDriver`]
//!   over `predictLongRunning` and `fetchPredictOperation`.
//!
//! Both authenticate with an OAuth access token read from
//! `GOOGLE_OAUTH_ACCESS_TOKEN` (for example the output of
//! `gcloud auth print-access-token`).
//!
//! ```no_run
//! use reelsmith_models::{VertexEndpoint, VertexVeoClient};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let endpoint = VertexEndpoint::from_env("my-project", "us-central1")?;
//! let veo = VertexVeoClient::new(endpoint, "veo-3.1-generate-preview", "veo-3.1-generate-preview")?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;
mod veo;
mod vertex;

pub use gemini::{
    GeminiCandidate, GeminiContent, GeminiInlineData, GeminiPart, GenerateContentRequest,
    GenerateContentResponse, VertexGeminiClient,
};
pub use veo::{
    GcsMedia, OperationError, OperationResult, OperationVideo, PredictInstance, PredictOperation,
    PredictParameters, PredictParametersBuilder, PredictRequest, VertexVeoClient,
    extension_output_prefix,
};
pub use vertex::{ACCESS_TOKEN_ENV, VertexCallError, VertexEndpoint};
