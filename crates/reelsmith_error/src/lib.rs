//! Error types for the Reelsmith pipeline.
//!
//! This crate provides the foundation error types used throughout the Reelsmith workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use reelsmith_error::{ReelsmithResult, HttpError};
//!
//! fn fetch_data() -> ReelsmithResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! assert!(fetch_data().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod gemini;
mod http;
mod json;
mod merge;
mod pipeline;
mod prompt;
mod storage;
mod veo;

pub use config::ConfigError;
pub use error::{ReelsmithError, ReelsmithErrorKind, ReelsmithResult};
pub use gemini::{GeminiError, GeminiErrorKind, RetryableError};
pub use http::HttpError;
pub use json::JsonError;
pub use merge::{MergeError, MergeErrorKind};
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use prompt::{PromptError, PromptErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use veo::{VeoError, VeoErrorKind};
