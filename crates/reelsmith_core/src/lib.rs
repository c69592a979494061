//! Core data types for the Reelsmith pipeline.
//!
//! This crate provides the data model shared by every stage: segment
//! directives, generated segments, the per-run request context, the
//! externally visible result, and the retry and poll policies.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod context;
mod directive;
mod image;
mod policy;
mod result;
mod segment;
mod video;

pub use context::RequestContext;
pub use directive::{
    DURATION_KEY, DirectiveContent, PRIMARY_CONTENT_KEY, SEGMENT_NUMBER_KEY, SegmentDirective,
};
pub use image::{ImageReference, ProductImage, mime_type_for};
pub use policy::{PollPolicy, RetryPolicy};
pub use result::PipelineResult;
pub use segment::{GeneratedSegment, SegmentStatus};
pub use video::{
    GeneratedVideo, OperationHandle, OperationStatus, VideoRequest, VideoRequestBuilder,
    VisionRequest,
};
