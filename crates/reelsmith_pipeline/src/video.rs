//! Video generation: directives in, stored video segments out.
//!
//! Two mutually exclusive modes:
//! - **Segmented**: every directive becomes an independent clip, each
//!   wrapped in bounded attempts. Failed clips are dropped.
//! - **Extension**: the first directive becomes a base clip that is then
//!   extended repeatedly. A failed extension ends the run early with the
//!   last good video.
//!
//! Each submitted operation moves `submitted -> polling -> {done_success |
//! done_error | timeout}`. Retries always resubmit; a stuck poll is never
//! resumed.

use derive_getters::Getters;
use reelsmith_config::{ExtensionConfig, GenerationMode, PipelineConfig, VideoConfig};
use reelsmith_core::{
    GeneratedSegment, GeneratedVideo, ImageReference, OperationHandle, OperationStatus,
    PollPolicy, RetryPolicy, SegmentDirective, VideoRequest,
};
use reelsmith_error::{ConfigError, PipelineError, PipelineErrorKind, ReelsmithResult};
use reelsmith_interface::{Sleeper, VideoDriver};
use reelsmith_storage::StorageManager;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// How a submitted operation ended.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum OperationOutcome {
    /// Finished with a video
    #[display("completed: {}", _0.uri())]
    Completed(GeneratedVideo),
    /// Finished with an error
    #[display("failed (code {:?}): {}", code, message)]
    Failed {
        /// Error code, if reported
        code: Option<i64>,
        /// Error message
        message: String,
    },
    /// Poll cap reached before completion
    #[display("timed out after {} polls", polls)]
    TimedOut {
        /// Polls made
        polls: u32,
    },
}

/// Result of extension mode.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ExtendedVideo {
    /// The longest video produced
    video: GeneratedVideo,
    /// Extensions that succeeded
    extensions_completed: u32,
    /// Achieved length in seconds
    duration: u32,
}

/// Pick the reference image for a segment.
///
/// With several images the pool is indexed by `segment_number` modulo its
/// size; otherwise the first image is used.
///
/// # Examples
///
/// ```
/// use reelsmith_core::ImageReference;
/// use reelsmith_pipeline::select_image;
///
/// let pool: Vec<_> = ["a", "b", "c"]
///     .iter()
///     .map(|n| ImageReference::new(format!("gs://b/{n}.png"), "image/png"))
///     .collect();
/// assert_eq!(select_image(&pool, 1).unwrap().uri(), "gs://b/b.png");
/// assert_eq!(select_image(&pool, 3).unwrap().uri(), "gs://b/a.png");
/// assert_eq!(select_image(&pool[..1], 2).unwrap().uri(), "gs://b/a.png");
/// assert!(select_image(&[], 1).is_none());
/// ```
pub fn select_image(images: &[ImageReference], segment_number: u32) -> Option<&ImageReference> {
    match images.len() {
        0 => None,
        1 => images.first(),
        len => images.get(segment_number as usize % len),
    }
}

/// Realizes directives through a [`VideoDriver`].
pub struct VideoGenerator {
    driver: Arc<dyn VideoDriver>,
    storage: StorageManager,
    sleeper: Arc<dyn Sleeper>,
    video: VideoConfig,
    extension: ExtensionConfig,
    retry: RetryPolicy,
    poll: PollPolicy,
}

impl std::fmt::Debug for VideoGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoGenerator")
            .field("model", &self.driver.model_name())
            .field("mode", &self.video.mode)
            .field("retry", &self.retry)
            .field("poll", &self.poll)
            .finish_non_exhaustive()
    }
}

impl VideoGenerator {
    /// Create a generator.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid, including extension
    /// limits when extension mode is selected.
    pub fn new(
        driver: Arc<dyn VideoDriver>,
        storage: StorageManager,
        sleeper: Arc<dyn Sleeper>,
        config: &PipelineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.video.mode == GenerationMode::Extension {
            config.extension.validate()?;
        }
        Ok(Self {
            driver,
            storage,
            sleeper,
            video: config.video.clone(),
            extension: config.extension,
            retry: config.retry.segment_policy(),
            poll: config.poll.policy(),
        })
    }

    /// Generate one clip per directive, in order.
    ///
    /// Directives whose payload is too short are skipped. Each remaining
    /// directive gets up to the configured number of attempts with linear
    /// backoff; a directive that exhausts them is dropped.
    ///
    /// # Errors
    ///
    /// Returns error if there are no directives or images, or if no
    /// segment succeeded.
    #[instrument(skip_all, fields(directives = directives.len(), images = images.len()))]
    pub async fn generate_segments(
        &self,
        directives: &[SegmentDirective],
        images: &[ImageReference],
    ) -> ReelsmithResult<Vec<GeneratedSegment>> {
        if directives.is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::NoDirectives).into());
        }

        let mut segments = Vec::with_capacity(directives.len());
        for directive in directives {
            let segment = self
                .generate_segment(directive, images, directives.len())
                .await?;
            if segment.is_success() {
                segments.push(segment);
            } else {
                warn!(segment = directive.segment_number(), "Dropping failed segment");
            }
        }

        if segments.is_empty() {
            error!(attempted = directives.len(), "No segments generated");
            return Err(
                PipelineError::new(PipelineErrorKind::NoSegmentsGenerated(directives.len()))
                    .into(),
            );
        }

        info!(
            generated = segments.len(),
            attempted = directives.len(),
            "Segment generation finished"
        );
        Ok(segments)
    }

    async fn generate_segment(
        &self,
        directive: &SegmentDirective,
        images: &[ImageReference],
        total_segments: usize,
    ) -> ReelsmithResult<GeneratedSegment> {
        let number = directive.segment_number();
        let duration = directive.duration();
        let start = number.saturating_sub(1).saturating_mul(duration);
        let end = start.saturating_add(duration);
        info!(segment = number, total_segments, start, end, "Generating segment");

        let Some(payload) = self.prepare_payload(directive) else {
            return Ok(GeneratedSegment::failed(number));
        };
        let image = select_image(images, number).ok_or_else(|| {
            PipelineError::new(PipelineErrorKind::InvalidInput(
                "No images provided".to_string(),
            ))
        })?;

        let output_uri = self.storage.segment_output_uri(number, start, end);
        let request = self.build_request(payload, image.clone(), duration, output_uri)?;

        let attempts = *self.retry.max_attempts();
        for attempt in 1..=attempts {
            if attempt > 1 {
                info!(segment = number, attempt, attempts, "Retrying segment");
            }

            match self.driver.submit(&request).await {
                Ok(handle) => match self.await_operation(&handle).await {
                    OperationOutcome::Completed(video) => {
                        info!(segment = number, uri = %video.uri(), "Segment succeeded");
                        return Ok(GeneratedSegment::succeeded(number, video.uri().clone()));
                    }
                    outcome => {
                        warn!(segment = number, attempt, %outcome, "Segment attempt failed")
                    }
                },
                Err(e) => warn!(segment = number, attempt, error = %e, "Submission failed"),
            }

            if self.retry.allows_retry_after(attempt) {
                self.sleeper.sleep(self.retry.delay_after(attempt)).await;
            }
        }

        error!(segment = number, attempts, "Segment failed after all attempts");
        Ok(GeneratedSegment::failed(number))
    }

    /// Grow one video from the first directive and image.
    ///
    /// The base clip gets a single attempt. Each extension adds the
    /// configured increment; the first failed extension stops the loop and
    /// the most recent good video is returned.
    ///
    /// # Errors
    ///
    /// Returns error if the extension limits are invalid (before any call
    /// is made) or the base video cannot be generated.
    #[instrument(skip_all, fields(segment = directive.segment_number(), image = %image.uri()))]
    pub async fn generate_extended(
        &self,
        directive: &SegmentDirective,
        image: &ImageReference,
    ) -> ReelsmithResult<ExtendedVideo> {
        self.extension.validate()?;

        let base_duration = self.extension.base_duration;
        info!(
            base_duration,
            extensions = self.extension.count,
            increment = self.extension.increment,
            target = self.extension.total_duration(),
            "Generating extended video"
        );

        let payload = self.prepare_payload(directive).ok_or_else(|| {
            PipelineError::new(PipelineErrorKind::BaseVideoFailed(
                "directive payload too short".to_string(),
            ))
        })?;
        let output_uri = self.storage.segment_output_uri(1, 0, base_duration);
        let request = self.build_request(payload, image.clone(), base_duration, output_uri)?;

        let handle = self.driver.submit(&request).await.map_err(|e| {
            PipelineError::new(PipelineErrorKind::BaseVideoFailed(e.to_string()))
        })?;
        let mut current = match self.await_operation(&handle).await {
            OperationOutcome::Completed(video) => video,
            outcome => {
                error!(%outcome, "Base video failed");
                return Err(
                    PipelineError::new(PipelineErrorKind::BaseVideoFailed(outcome.to_string()))
                        .into(),
                );
            }
        };
        info!(uri = %current.uri(), duration = base_duration, "Base video ready");

        let mut completed = 0;
        for step in 1..=self.extension.count {
            let from = self.extension.duration_after(completed);
            info!(step, of = self.extension.count, from, "Extending video");

            let outcome = match self.driver.extend(&current).await {
                Ok(handle) => self.await_operation(&handle).await,
                Err(e) => OperationOutcome::Failed {
                    code: None,
                    message: e.to_string(),
                },
            };

            match outcome {
                OperationOutcome::Completed(video) => {
                    completed += 1;
                    current = video;
                    info!(
                        step,
                        uri = %current.uri(),
                        duration = self.extension.duration_after(completed),
                        "Extension succeeded"
                    );
                }
                outcome => {
                    warn!(
                        step,
                        %outcome,
                        duration = from,
                        "Extension failed, keeping last good video"
                    );
                    break;
                }
            }
        }

        Ok(ExtendedVideo {
            video: current,
            extensions_completed: completed,
            duration: self.extension.duration_after(completed),
        })
    }

    /// Poll until the operation finishes or the poll cap is reached.
    ///
    /// Each poll is preceded by the interval wait. A failed status check
    /// pauses and still counts toward the cap.
    #[instrument(skip(self), fields(operation = %handle.name()))]
    pub async fn await_operation(&self, handle: &OperationHandle) -> OperationOutcome {
        let max_polls = *self.poll.max_polls();
        let interval = *self.poll.interval();

        for poll in 1..=max_polls {
            self.sleeper.sleep(interval).await;

            match self.driver.poll(handle).await {
                Ok(OperationStatus::Pending) => {
                    if poll % 4 == 0 {
                        debug!(
                            elapsed_secs = (interval * poll).as_secs(),
                            "Still generating"
                        );
                    }
                }
                Ok(OperationStatus::Succeeded(video)) => {
                    return OperationOutcome::Completed(video);
                }
                Ok(OperationStatus::Failed { code, message }) => {
                    warn!(?code, %message, "Operation reported an error");
                    return OperationOutcome::Failed { code, message };
                }
                Err(e) => {
                    warn!(poll, error = %e, "Polling failed");
                    self.sleeper.sleep(*self.poll.error_pause()).await;
                }
            }
        }

        warn!(
            max_polls,
            timeout_secs = self.poll.timeout().as_secs(),
            "Operation timed out"
        );
        OperationOutcome::TimedOut { polls: max_polls }
    }

    /// Transmitted text for a directive, or `None` if it is too short.
    fn prepare_payload(&self, directive: &SegmentDirective) -> Option<String> {
        let payload = directive.content().to_payload();
        let chars = payload.chars().count();
        if chars < self.video.min_prompt_chars {
            error!(
                segment = directive.segment_number(),
                chars,
                min = self.video.min_prompt_chars,
                "Prompt too short or empty"
            );
            return None;
        }
        debug!(
            segment = directive.segment_number(),
            chars,
            %payload,
            "Prompt sent to video model"
        );
        Some(payload)
    }

    fn build_request(
        &self,
        prompt: String,
        image: ImageReference,
        duration: u32,
        output_uri: String,
    ) -> ReelsmithResult<VideoRequest> {
        VideoRequest::builder()
            .prompt(prompt)
            .image(Some(image))
            .duration_seconds(duration)
            .aspect_ratio(self.video.aspect_ratio.clone())
            .resolution(self.video.resolution.clone())
            .generate_audio(self.video.generate_audio)
            .person_generation(self.video.person_generation())
            .output_uri(output_uri)
            .build()
            .map_err(|e| {
                PipelineError::new(PipelineErrorKind::InvalidInput(e.to_string())).into()
            })
    }
}
