//! Trait definitions for the Reelsmith pipeline.
//!
//! Every external collaborator of the pipeline sits behind one of these
//! traits so that the generators and the merger can be driven by scripted
//! fakes in tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{BlobStore, ClipConcatenator, Sleeper, TokioSleeper, VideoDriver, VisionDriver};
