//! End-to-end orchestration of one advertising video run.
//!
//! ```text
//! AdRequest -> validate -> PromptGenerator -> upload images
//!           -> segmented: VideoGenerator::generate_segments -> VideoMerger::merge
//!           -> extension: VideoGenerator::generate_extended -> signed URL
//!           -> PipelineResult
//! ```

use crate::{PromptBrief, PromptGenerator, VideoGenerator, VideoMerger, ordered_assets};
use derive_builder::Builder;
use derive_getters::Getters;
use reelsmith_config::{GenerationMode, PipelineConfig};
use reelsmith_core::{
    GeneratedSegment, ImageReference, PipelineResult, ProductImage, SegmentDirective,
};
use reelsmith_error::{
    ConfigError, PipelineError, PipelineErrorKind, ReelsmithError, ReelsmithErrorKind,
    ReelsmithResult,
};
use reelsmith_interface::{BlobStore, ClipConcatenator, Sleeper, VideoDriver, VisionDriver};
use reelsmith_storage::StorageManager;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Caller input for one run.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Getters)]
#[builder(setter(into))]
pub struct AdRequest {
    /// Product photos; the first one drives prompt generation
    images: Vec<ProductImage>,
    /// Product description
    product_overview: String,
    /// Brand rules, possibly empty
    #[builder(default)]
    brand_guidelines: String,
    /// Overrides `video.total_duration`
    #[builder(default)]
    total_duration: Option<u32>,
    /// Overrides `video.segment_duration`
    #[builder(default)]
    segment_duration: Option<u32>,
}

impl AdRequest {
    /// Creates a new builder for `AdRequest`.
    pub fn builder() -> AdRequestBuilder {
        AdRequestBuilder::default()
    }
}

/// User-facing text for a failed run.
///
/// Source locations stay in the logs; the caller only sees the condition.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{PipelineError, PipelineErrorKind, ReelsmithError};
/// use reelsmith_pipeline::failure_message;
///
/// let err: ReelsmithError =
///     PipelineError::new(PipelineErrorKind::InvalidInput("No images provided".into())).into();
/// assert_eq!(failure_message(&err), "No images provided");
/// ```
pub fn failure_message(err: &ReelsmithError) -> String {
    match err.kind() {
        ReelsmithErrorKind::Pipeline(e) => match &e.kind {
            PipelineErrorKind::InvalidInput(message) => message.clone(),
            kind => kind.to_string(),
        },
        ReelsmithErrorKind::Prompt(e) => e.kind.to_string(),
        ReelsmithErrorKind::Merge(e) => e.kind.to_string(),
        ReelsmithErrorKind::Storage(e) => e.kind.to_string(),
        ReelsmithErrorKind::Gemini(e) => e.kind.to_string(),
        ReelsmithErrorKind::Veo(e) => e.kind.to_string(),
        ReelsmithErrorKind::Config(e) => e.message.clone(),
        ReelsmithErrorKind::Http(e) => e.message.clone(),
        ReelsmithErrorKind::Json(e) => e.message.clone(),
    }
}

/// Sequences prompt generation, video generation and merging.
///
/// Collaborators are injected once; each run gets its own storage
/// namespace.
pub struct Pipeline {
    config: PipelineConfig,
    prompts: PromptGenerator,
    video: Arc<dyn VideoDriver>,
    store: Arc<dyn BlobStore>,
    concatenator: Arc<dyn ClipConcatenator>,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("mode", &self.config.video.mode)
            .field("prompts", &self.prompts)
            .field("video_model", &self.video.model_name())
            .field("backend", &self.store.backend_name())
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Create a pipeline.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid. Extension limits are
    /// checked here when extension mode is selected, so a bad setup fails
    /// before any model is called.
    pub fn new(
        config: PipelineConfig,
        vision: Arc<dyn VisionDriver>,
        video: Arc<dyn VideoDriver>,
        store: Arc<dyn BlobStore>,
        concatenator: Arc<dyn ClipConcatenator>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.video.mode == GenerationMode::Extension {
            config.extension.validate()?;
        }
        let prompts = PromptGenerator::new(vision, sleeper.clone(), &config)?;
        info!(
            mode = ?config.video.mode,
            video_model = %video.model_name(),
            backend = store.backend_name(),
            "Pipeline ready"
        );
        Ok(Self {
            config,
            prompts,
            video,
            store,
            concatenator,
            sleeper,
        })
    }

    /// The configuration this pipeline was built with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Prompt-only mode: validate and return the directives.
    ///
    /// # Errors
    ///
    /// Returns error if the request is invalid or prompt generation fails.
    #[instrument(skip_all, fields(images = request.images.len()))]
    pub async fn plan(&self, request: &AdRequest) -> ReelsmithResult<Vec<SegmentDirective>> {
        self.validate(request)?;
        let brief = self.brief(request)?;
        self.prompts.generate(&brief).await
    }

    /// Run the whole flow in the configured mode.
    ///
    /// Never fails: every error is logged and reported as
    /// [`PipelineResult::Failure`].
    #[instrument(skip_all, fields(images = request.images.len(), mode = ?self.config.video.mode))]
    pub async fn run(&self, request: &AdRequest) -> PipelineResult {
        match self.execute(request).await {
            Ok(result) => {
                info!(?result, "Pipeline finished");
                result
            }
            Err(e) => {
                error!(error = %e, "Pipeline failed");
                PipelineResult::failure(failure_message(&e))
            }
        }
    }

    async fn execute(&self, request: &AdRequest) -> ReelsmithResult<PipelineResult> {
        self.validate(request)?;
        let brief = self.brief(request)?;

        let planned = match self.config.video.mode {
            GenerationMode::Segmented => *brief.total_duration(),
            GenerationMode::Extension => self.config.extension.total_duration(),
        };
        info!(
            seconds = planned,
            resolution = %self.config.video.resolution,
            estimated_usd = self.config.estimated_cost(planned),
            "Estimated generation cost"
        );

        let directives = self.prompts.generate(&brief).await?;

        let storage = StorageManager::new(
            self.store.clone(),
            &self.config.storage.output_prefix,
            self.config.storage.signed_url_ttl(),
        );
        let images = self.upload_images(&storage, &request.images).await?;
        let generator = VideoGenerator::new(
            self.video.clone(),
            storage.clone(),
            self.sleeper.clone(),
            &self.config,
        )?;

        match self.config.video.mode {
            GenerationMode::Segmented => {
                let segments = generator.generate_segments(&directives, &images).await?;
                let merger =
                    VideoMerger::new(storage.clone(), self.concatenator.clone(), &self.config)?;
                let asset = merger.merge(&segments, *brief.total_duration()).await?;
                Ok(PipelineResult::Success {
                    asset_url: asset.signed_url().clone(),
                    request_id: storage.context().request_id().clone(),
                    segment_count: ordered_assets(&segments).len(),
                    duration: merged_duration(&directives, &segments),
                })
            }
            GenerationMode::Extension => {
                let directive = directives.first().ok_or_else(|| {
                    PipelineError::new(PipelineErrorKind::NoDirectives)
                })?;
                let image = images.first().ok_or_else(|| {
                    PipelineError::new(PipelineErrorKind::InvalidInput(
                        "No images provided".to_string(),
                    ))
                })?;
                let extended = generator.generate_extended(directive, image).await?;
                let uri = extended.video().uri();
                let asset_url = match storage.signed_url(uri).await {
                    Ok(url) => url,
                    Err(e) => {
                        warn!(uri = %uri, error = %e, "Could not sign extended video URL");
                        uri.clone()
                    }
                };
                Ok(PipelineResult::Success {
                    asset_url,
                    request_id: storage.context().request_id().clone(),
                    segment_count: 1,
                    duration: *extended.duration(),
                })
            }
        }
    }

    fn validate(&self, request: &AdRequest) -> ReelsmithResult<()> {
        let max = self.config.video.max_images;
        let problem = if request.images.is_empty() {
            Some("No images provided".to_string())
        } else if request.images.len() > max {
            Some(format!("Max {} images", max))
        } else if request.product_overview.trim().is_empty() {
            Some("Product overview is required".to_string())
        } else {
            None
        };

        match problem {
            Some(message) => {
                warn!(%message, "Rejecting request");
                Err(PipelineError::new(PipelineErrorKind::InvalidInput(message)).into())
            }
            None => Ok(()),
        }
    }

    fn brief(&self, request: &AdRequest) -> ReelsmithResult<PromptBrief> {
        let image = request.images.first().cloned().ok_or_else(|| {
            PipelineError::new(PipelineErrorKind::InvalidInput(
                "No images provided".to_string(),
            ))
        })?;
        PromptBrief::builder()
            .image(image)
            .product_overview(request.product_overview.clone())
            .brand_guidelines(request.brand_guidelines.clone())
            .total_duration(
                request
                    .total_duration
                    .unwrap_or(self.config.video.total_duration),
            )
            .segment_duration(
                request
                    .segment_duration
                    .unwrap_or(self.config.video.segment_duration),
            )
            .build()
            .map_err(|e| {
                PipelineError::new(PipelineErrorKind::InvalidInput(e.to_string())).into()
            })
    }

    async fn upload_images(
        &self,
        storage: &StorageManager,
        images: &[ProductImage],
    ) -> ReelsmithResult<Vec<ImageReference>> {
        let mut references = Vec::with_capacity(images.len());
        for image in images {
            references.push(storage.upload_image(image).await?);
        }
        info!(count = references.len(), "Uploaded product images");
        Ok(references)
    }
}

/// Seconds covered by the successful, de-duplicated segments.
fn merged_duration(directives: &[SegmentDirective], segments: &[GeneratedSegment]) -> u32 {
    let mut numbers: Vec<u32> = segments
        .iter()
        .filter(|s| s.is_success())
        .map(|s| *s.segment_number())
        .collect();
    numbers.sort_unstable();
    numbers.dedup();
    numbers
        .iter()
        .filter_map(|n| directives.iter().find(|d| d.segment_number() == *n))
        .map(SegmentDirective::duration)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelsmith_core::DirectiveContent;

    fn directive(n: u32, duration: u32) -> SegmentDirective {
        SegmentDirective::new(n, duration, DirectiveContent::Text(format!("scene {n}")))
    }

    #[test]
    fn test_merged_duration_counts_each_successful_segment_once() {
        let directives = vec![directive(1, 8), directive(2, 8), directive(3, 6)];
        let segments = vec![
            GeneratedSegment::succeeded(1, "a"),
            GeneratedSegment::failed(2),
            GeneratedSegment::succeeded(3, "c"),
            GeneratedSegment::succeeded(3, "c-again"),
        ];
        assert_eq!(merged_duration(&directives, &segments), 14);
    }

    #[test]
    fn test_merged_duration_is_zero_without_successes() {
        let directives = vec![directive(1, 8)];
        assert_eq!(merged_duration(&directives, &[GeneratedSegment::failed(1)]), 0);
    }
}
