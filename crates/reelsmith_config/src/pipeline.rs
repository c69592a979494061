//! Top-level pipeline configuration and loading.

use crate::sections::validate_sections;
use crate::{
    CostConfig, ExtensionConfig, GenerationMode, MergeConfig, ModelsConfig, PollConfig,
    PromptsConfig, RetryConfig, StorageConfig, VertexConfig, VideoConfig,
};
use config::{Config, Environment, File, FileFormat};
use reelsmith_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../reelsmith.toml");

/// Complete configuration for one pipeline instance.
///
/// Passed by value into each component constructor; nothing reads global
/// flags at call sites.
///
/// # Example
///
/// ```no_run
/// use reelsmith_config::PipelineConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = PipelineConfig::load()?;
/// println!("Segments of {}s", config.video.segment_duration);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Model identifiers
    pub models: ModelsConfig,
    /// Vertex AI placement
    pub vertex: VertexConfig,
    /// Output video settings
    pub video: VideoConfig,
    /// Extension mode parameters
    pub extension: ExtensionConfig,
    /// Attempt caps and backoff
    pub retry: RetryConfig,
    /// Operation polling
    pub poll: PollConfig,
    /// Blob storage
    pub storage: StorageConfig,
    /// Merge and render
    pub merge: MergeConfig,
    /// Directive persistence
    pub prompts: PromptsConfig,
    /// Cost estimation
    pub cost: CostConfig,
}

impl PipelineConfig {
    /// Load configuration with precedence: environment > current dir > home dir > bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns error if a source cannot be parsed or the result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(config_dir) = dirs::config_dir() {
            let home_config = config_dir.join("reelsmith").join("reelsmith.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("reelsmith").required(false))
            .add_source(
                Environment::with_prefix("REELSMITH")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::finish(builder)
    }

    /// Load bundled defaults overridden by one explicit file.
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing, malformed, or invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading configuration from file");

        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path));
        Self::finish(builder).map_err(|e| {
            ConfigError::new(format!(
                "Failed to read configuration from {}: {}",
                path.display(),
                e.message
            ))
        })
    }

    /// Parse bundled defaults overridden by TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(text, FileFormat::Toml));
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    ///
    /// Extension limits are only enforced when extension mode is selected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_sections(
            &self.video,
            &self.extension,
            &self.retry,
            &self.poll,
            &self.merge,
        )
    }

    /// Seconds of video a run produces in the configured mode.
    pub fn planned_duration(&self) -> u32 {
        match self.video.mode {
            GenerationMode::Segmented => self.video.total_duration,
            GenerationMode::Extension => self.extension.total_duration(),
        }
    }

    /// Estimated generation cost in USD for `seconds` of video.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsmith_config::PipelineConfig;
    ///
    /// let config = PipelineConfig::default();
    /// assert!((config.estimated_cost(16) - 1.12).abs() < 1e-9);
    /// ```
    pub fn estimated_cost(&self, seconds: u32) -> f64 {
        let rate = if self.video.resolution == "1080p" {
            self.cost.per_second_1080p
        } else {
            self.cost.per_second_720p
        };
        f64::from(seconds) * rate
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::new(format!("Failed to serialize configuration: {}", e)))
    }
}
