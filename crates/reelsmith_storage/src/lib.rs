//! Blob storage for the Reelsmith pipeline.
//!
//! This crate provides:
//! - [`StorageManager`], which scopes every upload of a run under its
//!   request namespace and names segment outputs and the final deliverable
//! - [`GcsBlobStore`], backed by Google Cloud Storage with V4 signed URLs
//! - [`FileSystemBlobStore`], a local directory tree for development and tests
//!
//! # Namespace Layout
//!
//! ```text
//! {output_prefix}/{request_id}/
//! ├── input_images/{file_name}
//! ├── segments/segment_01_00-08s.mp4
//! ├── segments/segment_02_08-16s.mp4
//! └── final_merged_video.mp4
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod filesystem;
mod gcs;
mod manager;

pub use backend::blob_store_from_config;
pub use filesystem::FileSystemBlobStore;
pub use gcs::GcsBlobStore;
pub use manager::{FINAL_VIDEO_NAME, FinalAsset, StorageManager};
