//! Configuration for the Reelsmith pipeline.
//!
//! Configuration is loaded from multiple sources with precedence:
//! - Bundled defaults (include_str! from reelsmith.toml)
//! - User overrides (~/.config/reelsmith/reelsmith.toml, then ./reelsmith.toml)
//! - Environment variables prefixed `REELSMITH__`
//!
//! Validation runs once, at load time or when a component is constructed,
//! so that a bad configuration fails before any network call.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod pipeline;
mod sections;

pub use pipeline::PipelineConfig;
pub use sections::{
    CostConfig, ExtensionConfig, GenerationMode, MAX_EXTENSION_COUNT, MIN_EXTENSION_COUNT,
    MergeConfig, ModelsConfig, PLATFORM_MAX_VIDEO_SECONDS, PollConfig, PromptsConfig, RetryConfig,
    StorageBackendKind, StorageConfig, VertexConfig, VideoConfig,
};
