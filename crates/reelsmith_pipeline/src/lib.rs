//! Advertising video pipeline for Reelsmith.
//!
//! This crate turns product photos and a short brief into one stored video:
//!
//! 1. [`PromptGenerator`] asks a text/vision model for per-segment
//!    directives and reconciles whatever shape comes back
//!    ([`ModelResponse`]) to the required segment count.
//! 2. [`VideoGenerator`] realizes directives through a video model, either
//!    as independent clips or as one repeatedly extended clip.
//! 3. [`VideoMerger`] downloads, concatenates and uploads the clips.
//! 4. [`Pipeline`] sequences the stages and reports a [`reelsmith_core::PipelineResult`].
//!
//! Every external collaborator is a trait object from
//! [`reelsmith_interface`], so the whole flow runs against fakes in tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod directives;
mod extraction;
mod ffmpeg;
mod merger;
mod orchestrator;
mod prompt;
mod response;
mod video;

pub use directives::{FALLBACK_CONTENT_KEYS, build_directives, segment_count};
pub use extraction::{extract_balanced, strip_code_fences};
pub use ffmpeg::{FfmpegConcatenator, MANIFEST_FILE_NAME};
pub use merger::{
    SINGLE_OUTPUT_NAME, SINGLE_TEMP_NAME, TEMP_FILE_PREFIXES, VideoMerger, merged_output_name,
    ordered_assets, segment_temp_name,
};
pub use orchestrator::{AdRequest, AdRequestBuilder, Pipeline, failure_message};
pub use prompt::{
    PromptBrief, PromptBriefBuilder, PromptGenerator, build_instruction, load_directives,
    save_directives,
};
pub use response::ModelResponse;
pub use video::{ExtendedVideo, OperationOutcome, VideoGenerator, select_image};
