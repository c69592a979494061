//! Configuration sections.

use reelsmith_core::{PollPolicy, RetryPolicy};
use reelsmith_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Fewest extensions allowed in extension mode.
pub const MIN_EXTENSION_COUNT: u32 = 1;
/// Most extensions allowed in extension mode.
pub const MAX_EXTENSION_COUNT: u32 = 20;
/// Longest video the platform can produce by extension, in seconds.
pub const PLATFORM_MAX_VIDEO_SECONDS: u32 = 148;

const ASPECT_RATIOS: &[&str] = &["16:9", "9:16"];
const RESOLUTIONS: &[&str] = &["720p", "1080p"];

/// Model identifiers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Text/vision model used for prompt generation
    pub text_model: String,
    /// Video model used for segment and base generation
    pub video_model: String,
    /// Video model used for extensions
    pub extension_model: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            text_model: "gemini-2.5-pro".to_string(),
            video_model: "veo-3.1-generate-preview".to_string(),
            extension_model: "veo-3.1-generate-preview".to_string(),
        }
    }
}

/// Vertex AI project placement.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VertexConfig {
    /// Google Cloud project id
    pub project: String,
    /// Region such as `us-central1`
    pub location: String,
}

impl Default for VertexConfig {
    fn default() -> Self {
        Self {
            project: String::new(),
            location: "us-central1".to_string(),
        }
    }
}

/// Which generation strategy a run uses.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GenerationMode {
    /// Independent segments merged afterwards
    #[default]
    Segmented,
    /// One video grown by repeated extension
    Extension,
}

/// Output video settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Generation strategy
    pub mode: GenerationMode,
    /// Default total length in seconds
    pub total_duration: u32,
    /// Default segment length in seconds
    pub segment_duration: u32,
    /// Shortest segment the video model accepts
    pub min_segment_duration: u32,
    /// Longest segment the video model accepts
    pub max_segment_duration: u32,
    /// Aspect ratio, `16:9` or `9:16`
    pub aspect_ratio: String,
    /// Resolution, `720p` or `1080p`
    pub resolution: String,
    /// Whether the model synthesizes audio
    pub generate_audio: bool,
    /// Whether people may appear in generated footage
    pub allow_people: bool,
    /// Most product images per request
    pub max_images: usize,
    /// Shortest acceptable transmitted prompt, in characters
    pub min_prompt_chars: usize,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            mode: GenerationMode::Segmented,
            total_duration: 16,
            segment_duration: 8,
            min_segment_duration: 4,
            max_segment_duration: 8,
            aspect_ratio: "16:9".to_string(),
            resolution: "720p".to_string(),
            generate_audio: false,
            allow_people: false,
            max_images: 3,
            min_prompt_chars: 10,
        }
    }
}

impl VideoConfig {
    /// Value of the video model's `personGeneration` parameter.
    pub fn person_generation(&self) -> &'static str {
        if self.allow_people {
            "allow_adult"
        } else {
            "disabled"
        }
    }

    /// Describe why a `(total, segment)` pair is unusable, if it is.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsmith_config::VideoConfig;
    ///
    /// let video = VideoConfig::default();
    /// assert!(video.duration_violation(16, 8).is_none());
    /// assert!(video.duration_violation(12, 8).is_some());
    /// assert!(video.duration_violation(0, 8).is_some());
    /// ```
    pub fn duration_violation(&self, total: u32, segment: u32) -> Option<String> {
        if total == 0 || segment == 0 {
            return Some(format!(
                "durations must be positive (total {}s, segment {}s)",
                total, segment
            ));
        }
        if segment < self.min_segment_duration || segment > self.max_segment_duration {
            return Some(format!(
                "segment duration {}s outside [{}, {}]",
                segment, self.min_segment_duration, self.max_segment_duration
            ));
        }
        if total % segment != 0 {
            return Some(format!(
                "total duration {}s is not a multiple of segment duration {}s",
                total, segment
            ));
        }
        None
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_segment_duration == 0 || self.min_segment_duration > self.max_segment_duration
        {
            return Err(ConfigError::new(format!(
                "invalid segment duration bounds [{}, {}]",
                self.min_segment_duration, self.max_segment_duration
            )));
        }
        if let Some(violation) = self.duration_violation(self.total_duration, self.segment_duration)
        {
            return Err(ConfigError::new(violation));
        }
        if !ASPECT_RATIOS.contains(&self.aspect_ratio.as_str()) {
            return Err(ConfigError::new(format!(
                "unsupported aspect ratio '{}'",
                self.aspect_ratio
            )));
        }
        if !RESOLUTIONS.contains(&self.resolution.as_str()) {
            return Err(ConfigError::new(format!(
                "unsupported resolution '{}'",
                self.resolution
            )));
        }
        if self.max_images == 0 {
            return Err(ConfigError::new("max_images must be at least 1"));
        }
        Ok(())
    }
}

/// Extension mode parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtensionConfig {
    /// Length of the base video in seconds
    pub base_duration: u32,
    /// Number of extension steps
    pub count: u32,
    /// Seconds added by each extension
    pub increment: u32,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            base_duration: 8,
            count: 3,
            increment: 7,
        }
    }
}

impl ExtensionConfig {
    /// Length after every extension succeeds.
    pub fn total_duration(&self) -> u32 {
        self.base_duration
            .saturating_add(self.count.saturating_mul(self.increment))
    }

    /// Length after `completed` extensions.
    pub fn duration_after(&self, completed: u32) -> u32 {
        self.base_duration
            .saturating_add(completed.saturating_mul(self.increment))
    }

    /// Check the count range and the platform ceiling.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsmith_config::ExtensionConfig;
    ///
    /// let ok = ExtensionConfig { base_duration: 8, count: 20, increment: 7 };
    /// assert!(ok.validate().is_ok());
    ///
    /// let too_long = ExtensionConfig { count: 21, ..ok };
    /// assert!(too_long.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_EXTENSION_COUNT..=MAX_EXTENSION_COUNT).contains(&self.count) {
            return Err(ConfigError::new(format!(
                "extension count {} must be between {} and {}",
                self.count, MIN_EXTENSION_COUNT, MAX_EXTENSION_COUNT
            )));
        }
        if self.base_duration == 0 || self.increment == 0 {
            return Err(ConfigError::new(
                "extension base duration and increment must be positive",
            ));
        }
        let total = self.total_duration();
        if total > PLATFORM_MAX_VIDEO_SECONDS {
            return Err(ConfigError::new(format!(
                "extended video would last {}s ({} + {} x {}), above the {}s platform limit",
                total, self.base_duration, self.count, self.increment, PLATFORM_MAX_VIDEO_SECONDS
            )));
        }
        Ok(())
    }
}

/// Attempt caps and backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts for the text/vision call
    pub prompt_attempts: u32,
    /// Attempts per video segment
    pub segment_attempts: u32,
    /// Linear backoff unit in seconds
    pub backoff_step_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            prompt_attempts: 5,
            segment_attempts: 3,
            backoff_step_secs: 10,
        }
    }
}

impl RetryConfig {
    /// Policy for prompt generation.
    pub fn prompt_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.prompt_attempts,
            Duration::from_secs(self.backoff_step_secs),
        )
    }

    /// Policy for each video segment.
    pub fn segment_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.segment_attempts,
            Duration::from_secs(self.backoff_step_secs),
        )
    }
}

/// Operation polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PollConfig {
    /// Seconds between status checks
    pub interval_secs: u64,
    /// Status checks before timing out
    pub max_polls: u32,
    /// Extra seconds to wait after a failed status check
    pub error_pause_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: 15,
            max_polls: 60,
            error_pause_secs: 5,
        }
    }
}

impl PollConfig {
    /// Policy value handed to generators.
    pub fn policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_secs(self.interval_secs),
            self.max_polls,
            Duration::from_secs(self.error_pause_secs),
        )
    }
}

/// Blob storage backend selector.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StorageBackendKind {
    /// Google Cloud Storage
    #[default]
    Gcs,
    /// Local directory tree
    Filesystem,
}

/// Blob storage settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend selector
    pub backend: StorageBackendKind,
    /// Bucket name for the GCS backend
    pub bucket: String,
    /// Prefix under which every run's namespace is created
    pub output_prefix: String,
    /// Root directory for the filesystem backend
    pub local_root: PathBuf,
    /// Lifetime of signed URLs in seconds
    pub signed_url_ttl_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendKind::Gcs,
            bucket: String::new(),
            output_prefix: "veo-product-videos".to_string(),
            local_root: PathBuf::from("reelsmith-storage"),
            signed_url_ttl_secs: 86_400,
        }
    }
}

impl StorageConfig {
    /// Signed URL lifetime.
    pub fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.signed_url_ttl_secs)
    }
}

/// Merge and render settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Directory holding temporary and final local files
    pub work_dir: PathBuf,
    /// Output frame rate
    pub fps: u32,
    /// Video codec
    pub video_codec: String,
    /// Encoder preset
    pub preset: String,
    /// Video bitrate such as `2000k`
    pub bitrate: String,
    /// Audio codec
    pub audio_codec: String,
    /// Encoder threads
    pub threads: u32,
    /// ffmpeg executable
    pub ffmpeg_binary: String,
    /// Keep the local merged file after upload
    pub testing_mode: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            fps: 24,
            video_codec: "libx264".to_string(),
            preset: "medium".to_string(),
            bitrate: "2000k".to_string(),
            audio_codec: "aac".to_string(),
            threads: 2,
            ffmpeg_binary: "ffmpeg".to_string(),
            testing_mode: false,
        }
    }
}

/// Persistence of the generated directive list.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Write the list after each generation
    pub save_to_file: bool,
    /// Destination file
    pub output_file: PathBuf,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            save_to_file: true,
            output_file: PathBuf::from("veo_generated_prompts.json"),
        }
    }
}

/// Cost estimation rates in USD per generated second.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CostConfig {
    /// Rate at 720p
    pub per_second_720p: f64,
    /// Rate at 1080p
    pub per_second_1080p: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            per_second_720p: 0.07,
            per_second_1080p: 0.10,
        }
    }
}

pub(crate) fn validate_sections(
    video: &VideoConfig,
    extension: &ExtensionConfig,
    retry: &RetryConfig,
    poll: &PollConfig,
    merge: &MergeConfig,
) -> Result<(), ConfigError> {
    video.validate()?;
    if video.mode == GenerationMode::Extension {
        extension.validate()?;
    }
    if retry.prompt_attempts == 0 || retry.segment_attempts == 0 {
        return Err(ConfigError::new("retry attempts must be at least 1"));
    }
    if poll.max_polls == 0 {
        return Err(ConfigError::new("max_polls must be at least 1"));
    }
    if merge.fps == 0 {
        return Err(ConfigError::new("fps must be positive"));
    }
    Ok(())
}
