//! Reelsmith - product advertising videos from photos.
//!
//! Reelsmith asks a Gemini vision model to break a product brief into
//! timed scene directives, renders them with Veo on Vertex AI, and
//! stitches the clips into one stored video.
//!
//! # Architecture
//!
//! Reelsmith is organized as a workspace with focused crates:
//!
//! - `reelsmith_error` - Error types
//! - `reelsmith_core` - Core data types (directives, segments, results)
//! - `reelsmith_interface` - Driver, storage and concatenation traits
//! - `reelsmith_config` - Layered TOML configuration
//! - `reelsmith_storage` - GCS and filesystem blob stores
//! - `reelsmith_models` - Vertex AI Gemini and Veo clients
//! - `reelsmith_pipeline` - Prompt generation, video generation, merging
//!
//! This crate (`reelsmith`) re-exports everything for convenience and wires
//! the production collaborators together in [`build_pipeline`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use reelsmith::{AdRequest, PipelineConfig, ProductImage, build_pipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = build_pipeline(PipelineConfig::load()?)?;
//!     let request = AdRequest::builder()
//!         .images(vec![ProductImage::from_path("mug.png").await?])
//!         .product_overview("A hand-thrown ceramic mug")
//!         .build()?;
//!     println!("{}", serde_json::to_string_pretty(&pipeline.run(&request).await)?);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod observability;

pub use observability::{ObservabilityConfig, init_observability, init_observability_with_config};

pub use reelsmith_config::*;
pub use reelsmith_core::*;
pub use reelsmith_error::*;
pub use reelsmith_interface::*;
pub use reelsmith_models::*;
pub use reelsmith_pipeline::*;
pub use reelsmith_storage::*;

use std::sync::Arc;
use tracing::info;

/// Build a [`Pipeline`] backed by Vertex AI, the configured blob store,
/// and ffmpeg.
///
/// # Errors
///
/// Returns error if the configuration is invalid, the access token is
/// missing, or a client or store cannot be created.
pub fn build_pipeline(config: PipelineConfig) -> ReelsmithResult<Pipeline> {
    let endpoint = VertexEndpoint::from_env(&config.vertex.project, &config.vertex.location)?;
    let vision = VertexGeminiClient::new(endpoint.clone(), &config.models.text_model)?;
    let video = VertexVeoClient::new(
        endpoint,
        &config.models.video_model,
        &config.models.extension_model,
    )?;
    let store = blob_store_from_config(&config.storage)?;
    let concatenator = FfmpegConcatenator::from_config(&config.merge);

    info!(
        project = %config.vertex.project,
        location = %config.vertex.location,
        text_model = %config.models.text_model,
        video_model = %config.models.video_model,
        "Wiring Vertex AI pipeline"
    );

    Ok(Pipeline::new(
        config,
        Arc::new(vision),
        Arc::new(video),
        store,
        Arc::new(concatenator),
        Arc::new(TokioSleeper),
    )?)
}
