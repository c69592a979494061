//! Test utilities for pipeline tests.
//!
//! This module provides mock drivers, recording fakes and a harness that
//! wires them to a filesystem blob store in a temp directory.

#![allow(dead_code)]

pub mod fakes;
pub mod mock_video;
pub mod mock_vision;

#[allow(unused_imports)]
pub use fakes::{RecordingConcatenator, RecordingSleeper};
#[allow(unused_imports)]
pub use mock_video::{MockPoll, MockVideoDriver};
#[allow(unused_imports)]
pub use mock_vision::{MockResponse, MockVisionDriver};

use reelsmith_config::{PipelineConfig, StorageBackendKind};
use reelsmith_core::{ProductImage, RequestContext};
use reelsmith_storage::{FileSystemBlobStore, StorageManager};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Temp directory, configuration and blob store for one test.
pub struct Harness {
    pub dir: TempDir,
    pub config: PipelineConfig,
    pub store: Arc<FileSystemBlobStore>,
}

impl Harness {
    /// Filesystem storage, fast polling, directives persisted in the temp dir.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PipelineConfig::default();
        config.storage.backend = StorageBackendKind::Filesystem;
        config.storage.local_root = dir.path().join("blobs");
        config.merge.work_dir = dir.path().join("work");
        config.prompts.output_file = dir.path().join("prompts.json");
        config.poll.max_polls = 3;
        let store = Arc::new(FileSystemBlobStore::new(&config.storage.local_root).unwrap());
        Self { dir, config, store }
    }

    pub fn work_dir(&self) -> PathBuf {
        self.config.merge.work_dir.clone()
    }

    /// Manager with a fixed request id.
    pub fn storage(&self) -> StorageManager {
        StorageManager::with_context(
            self.store.clone(),
            RequestContext::with_id("veo-product-videos", "1700000000_ab12cd34"),
            Duration::from_secs(60),
        )
    }
}

pub fn product_image(name: &str) -> ProductImage {
    ProductImage::new(name, vec![0x89, b'P', b'N', b'G'])
}

/// Names in `dir` starting with any of `prefixes`.
pub fn files_with_prefixes(dir: &Path, prefixes: &[&str]) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| prefixes.iter().any(|p| name.starts_with(p)))
        .collect()
}
