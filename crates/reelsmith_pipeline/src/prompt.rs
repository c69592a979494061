//! Prompt generation: one image and a brief in, N segment directives out.

use crate::{ModelResponse, build_directives, failure_message, segment_count};
use derive_builder::Builder;
use derive_getters::Getters;
use reelsmith_config::{PipelineConfig, PromptsConfig, VideoConfig};
use reelsmith_core::{ProductImage, RetryPolicy, SegmentDirective, VisionRequest};
use reelsmith_error::{
    ConfigError, GeminiErrorKind, JsonError, PromptError, PromptErrorKind, ReelsmithError,
    ReelsmithErrorKind, ReelsmithResult, RetryableError, StorageError, StorageErrorKind,
};
use reelsmith_interface::{Sleeper, VisionDriver};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

const INSTRUCTION_TEMPLATE: &str = include_str!("../templates/segment_instruction.txt");

const PEOPLE_SAFETY_NOTE: &str = "\
CRITICAL SAFETY RULE:
- Never show people, hands, or the product in operation
- Static product showcase only, with camera movement
- Include \"negative prompt: no people, no hands, not in use\" in each veo_prompt
";

/// What the commercial is about.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Getters)]
#[builder(setter(into))]
pub struct PromptBrief {
    /// Reference image sent to the model
    image: ProductImage,
    /// Product description
    product_overview: String,
    /// Brand rules, possibly empty
    #[builder(default)]
    brand_guidelines: String,
    /// Length of the whole commercial in seconds
    total_duration: u32,
    /// Length of each segment in seconds
    segment_duration: u32,
}

impl PromptBrief {
    /// Creates a new builder for `PromptBrief`.
    pub fn builder() -> PromptBriefBuilder {
        PromptBriefBuilder::default()
    }
}

/// Fill the instruction template for `brief`.
///
/// # Examples
///
/// ```
/// use reelsmith_config::VideoConfig;
/// use reelsmith_core::ProductImage;
/// use reelsmith_pipeline::{PromptBrief, build_instruction};
///
/// let brief = PromptBrief::builder()
///     .image(ProductImage::new("kettle.png", vec![0]))
///     .product_overview("Matte black kettle")
///     .total_duration(16u32)
///     .segment_duration(8u32)
///     .build()
///     .unwrap();
/// let instruction = build_instruction(&brief, &VideoConfig::default());
/// assert!(instruction.contains("Matte black kettle"));
/// assert!(instruction.contains("exactly 2 objects"));
/// assert!(instruction.contains("CRITICAL SAFETY RULE"));
/// ```
pub fn build_instruction(brief: &PromptBrief, video: &VideoConfig) -> String {
    let count = segment_count(brief.total_duration, brief.segment_duration);
    let safety_note = if video.allow_people {
        ""
    } else {
        PEOPLE_SAFETY_NOTE
    };
    let brand = if brief.brand_guidelines.trim().is_empty() {
        "none provided"
    } else {
        brief.brand_guidelines.as_str()
    };

    INSTRUCTION_TEMPLATE
        .replace("{segment_count}", &count.to_string())
        .replace("{segment_duration}", &brief.segment_duration.to_string())
        .replace("{total_duration}", &brief.total_duration.to_string())
        .replace("{aspect_ratio}", &video.aspect_ratio)
        .replace("{resolution}", &video.resolution)
        .replace("{safety_note}", safety_note)
        .replace("{product_overview}", &brief.product_overview)
        .replace("{brand_guidelines}", brand)
}

/// Why an attempt produced nothing usable.
enum AttemptFailure {
    Empty,
    Unavailable(String),
}

/// Turns a brief into an ordered list of segment directives.
pub struct PromptGenerator {
    driver: Arc<dyn VisionDriver>,
    sleeper: Arc<dyn Sleeper>,
    video: VideoConfig,
    prompts: PromptsConfig,
    retry: RetryPolicy,
}

impl std::fmt::Debug for PromptGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptGenerator")
            .field("model", &self.driver.model_name())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl PromptGenerator {
    /// Create a generator.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid.
    pub fn new(
        driver: Arc<dyn VisionDriver>,
        sleeper: Arc<dyn Sleeper>,
        config: &PipelineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            driver,
            sleeper,
            video: config.video.clone(),
            prompts: config.prompts.clone(),
            retry: config.retry.prompt_policy(),
        })
    }

    /// Ask the model for directives and reconcile them to the segment count.
    ///
    /// Empty responses and unavailable-service errors are retried with
    /// linear backoff; any other model error aborts at once.
    ///
    /// # Errors
    ///
    /// Returns error if the durations are unusable, the model call fails
    /// with a non-transient error, or every attempt was empty or unavailable.
    #[instrument(
        skip(self, brief),
        fields(
            model = %self.driver.model_name(),
            total = brief.total_duration,
            segment = brief.segment_duration
        )
    )]
    pub async fn generate(&self, brief: &PromptBrief) -> ReelsmithResult<Vec<SegmentDirective>> {
        let total = brief.total_duration;
        let segment = brief.segment_duration;
        if let Some(violation) = self.video.duration_violation(total, segment) {
            warn!(%violation, "Rejecting durations");
            return Err(
                PromptError::new(PromptErrorKind::InvalidDurations { total, segment }).into(),
            );
        }

        let count = segment_count(total, segment);
        let instruction = build_instruction(brief, &self.video);
        let request = VisionRequest::new(instruction, brief.image.clone());
        let attempts = *self.retry.max_attempts();
        let mut last_failure = AttemptFailure::Empty;

        for attempt in 1..=attempts {
            info!(attempt, attempts, segments = count, "Requesting segment prompts");

            match self.driver.generate(&request).await {
                Ok(text) if !text.trim().is_empty() => {
                    let response = ModelResponse::parse(&text);
                    let directives = build_directives(response, count, segment);
                    log_directives(&directives);
                    self.persist(&directives).await;
                    return Ok(directives);
                }
                Ok(_) => {
                    warn!(attempt, "Model returned an empty response");
                    last_failure = AttemptFailure::Empty;
                }
                Err(e) if is_empty_response(&e) => {
                    warn!(attempt, "Model returned no content");
                    last_failure = AttemptFailure::Empty;
                }
                Err(e) if is_transient(&e) => {
                    warn!(attempt, error = %e, "Model unavailable");
                    last_failure = AttemptFailure::Unavailable(failure_message(&e));
                }
                Err(e) => {
                    error!(attempt, error = %e, "Prompt generation failed");
                    return Err(e);
                }
            }

            if self.retry.allows_retry_after(attempt) {
                let delay = self.retry.delay_after(attempt);
                debug!(delay_secs = delay.as_secs(), "Backing off before retry");
                self.sleeper.sleep(delay).await;
            }
        }

        error!(attempts, "Prompt generation exhausted its attempts");
        let kind = match last_failure {
            AttemptFailure::Empty => PromptErrorKind::EmptyAfterRetries(attempts),
            AttemptFailure::Unavailable(message) => {
                PromptErrorKind::UnavailableAfterRetries { attempts, message }
            }
        };
        Err(PromptError::new(kind).into())
    }

    /// Write the directives for inspection. Failures are logged only.
    async fn persist(&self, directives: &[SegmentDirective]) {
        if !self.prompts.save_to_file {
            return;
        }
        match save_directives(&self.prompts.output_file, directives).await {
            Ok(()) => info!(
                path = %self.prompts.output_file.display(),
                count = directives.len(),
                "Saved directives"
            ),
            Err(e) => warn!(
                path = %self.prompts.output_file.display(),
                error = %e,
                "Could not save directives"
            ),
        }
    }
}

fn is_empty_response(err: &ReelsmithError) -> bool {
    matches!(
        err.kind(),
        ReelsmithErrorKind::Gemini(inner) if inner.kind == GeminiErrorKind::EmptyResponse
    )
}

fn is_transient(err: &ReelsmithError) -> bool {
    match err.kind() {
        ReelsmithErrorKind::Gemini(inner) => inner.is_retryable(),
        _ => false,
    }
}

fn log_directives(directives: &[SegmentDirective]) {
    for directive in directives {
        let payload = directive.content().to_payload();
        info!(
            segment = directive.segment_number(),
            duration = directive.duration(),
            chars = payload.chars().count(),
            "Prepared directive"
        );
        debug!(segment = directive.segment_number(), %payload, "Directive payload");
    }
}

/// Write directives as pretty JSON, overwriting `path`.
///
/// # Errors
///
/// Returns error if serialization or the write fails.
pub async fn save_directives(
    path: &Path,
    directives: &[SegmentDirective],
) -> ReelsmithResult<()> {
    let json = serde_json::to_string_pretty(directives)
        .map_err(|e| JsonError::new(format!("Failed to serialize directives: {}", e)))?;
    tokio::fs::write(path, json).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            path.display(),
            e
        )))
    })?;
    Ok(())
}

/// Read directives written by [`save_directives`].
///
/// # Errors
///
/// Returns error if the file cannot be read or is not a directive list.
pub async fn load_directives(path: &Path) -> ReelsmithResult<Vec<SegmentDirective>> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StorageError::new(StorageErrorKind::NotFound(path.display().to_string()))
        } else {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        }
    })?;
    let directives = serde_json::from_str(&text).map_err(|e| {
        JsonError::new(format!(
            "Failed to parse directives in {}: {}",
            path.display(),
            e
        ))
    })?;
    Ok(directives)
}
