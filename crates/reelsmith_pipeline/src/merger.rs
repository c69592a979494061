//! Merging generated segments into one deliverable.
//!
//! Local files use fixed names inside `merge.work_dir`, so two runs on
//! the same machine must not merge at the same time.

use reelsmith_config::{MergeConfig, PipelineConfig};
use reelsmith_core::GeneratedSegment;
use reelsmith_error::{ConfigError, MergeError, MergeErrorKind, ReelsmithResult};
use reelsmith_interface::ClipConcatenator;
use reelsmith_storage::{FinalAsset, StorageManager};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// File name prefixes removed by the orphan sweep.
pub const TEMP_FILE_PREFIXES: [&str; 3] = ["temp_segment_", "temp_single_", "temp_audio"];

/// Local download of a lone segment.
pub const SINGLE_TEMP_NAME: &str = "temp_single_video.mp4";

/// Local deliverable when only one segment exists.
pub const SINGLE_OUTPUT_NAME: &str = "final_product_video_single.mp4";

/// Local deliverable for a multi-segment merge.
pub fn merged_output_name(total_duration: u32) -> String {
    format!("final_product_video_{}s.mp4", total_duration)
}

/// Local download of segment `index` (1-based).
pub fn segment_temp_name(index: usize) -> String {
    format!("temp_segment_{}.mp4", index)
}

/// Asset references of successful segments in merge order.
///
/// Sorted by ascending segment number; a segment number seen twice is
/// merged once.
///
/// # Examples
///
/// ```
/// use reelsmith_core::GeneratedSegment;
/// use reelsmith_pipeline::ordered_assets;
///
/// let segments = vec![
///     GeneratedSegment::succeeded(2, "gs://b/two.mp4"),
///     GeneratedSegment::failed(3),
///     GeneratedSegment::succeeded(1, "gs://b/one.mp4"),
///     GeneratedSegment::succeeded(2, "gs://b/two-again.mp4"),
/// ];
/// assert_eq!(ordered_assets(&segments), vec!["gs://b/one.mp4", "gs://b/two.mp4"]);
/// ```
pub fn ordered_assets(segments: &[GeneratedSegment]) -> Vec<String> {
    let mut successful: Vec<&GeneratedSegment> =
        segments.iter().filter(|s| s.is_success()).collect();
    successful.sort_by_key(|s| *s.segment_number());
    successful.dedup_by_key(|s| *s.segment_number());
    successful
        .into_iter()
        .map(|s| s.asset_reference().clone())
        .collect()
}

/// Combines stored segments into one uploaded video.
pub struct VideoMerger {
    storage: StorageManager,
    concatenator: Arc<dyn ClipConcatenator>,
    config: MergeConfig,
}

impl std::fmt::Debug for VideoMerger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoMerger")
            .field("storage", &self.storage)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl VideoMerger {
    /// Create a merger.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid.
    pub fn new(
        storage: StorageManager,
        concatenator: Arc<dyn ClipConcatenator>,
        config: &PipelineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            storage,
            concatenator,
            config: config.merge.clone(),
        })
    }

    /// Merge and upload, then sweep orphaned temp files.
    ///
    /// A single segment is downloaded and uploaded as-is without touching
    /// the concatenator. Several segments are downloaded, concatenated in
    /// ascending segment order and rendered. The sweep runs on success and
    /// on failure.
    ///
    /// # Errors
    ///
    /// Returns error if there is nothing to merge or any download, render
    /// or upload fails. No partial output is left behind.
    #[instrument(skip(self, segments), fields(segments = segments.len()))]
    pub async fn merge(
        &self,
        segments: &[GeneratedSegment],
        total_duration: u32,
    ) -> ReelsmithResult<FinalAsset> {
        let result = self.merge_assets(&ordered_assets(segments), total_duration).await;

        self.sweep_orphans().await;

        if let Err(e) = &result {
            error!(error = %e, "Merge failed");
        }
        result
    }

    async fn merge_assets(
        &self,
        assets: &[String],
        total_duration: u32,
    ) -> ReelsmithResult<FinalAsset> {
        if assets.is_empty() {
            return Err(MergeError::new(MergeErrorKind::NoSegments).into());
        }
        self.prepare_work_dir().await?;
        match assets {
            [single] => self.merge_single(single).await,
            many => self.merge_many(many, total_duration).await,
        }
    }

    async fn merge_single(&self, uri: &str) -> ReelsmithResult<FinalAsset> {
        info!(uri, "Single segment, skipping concatenation");
        let temp = self.local_path(SINGLE_TEMP_NAME);
        let output = self.local_path(SINGLE_OUTPUT_NAME);

        let staged = self.stage_single(uri, &temp, &output).await;
        remove_quietly(&temp).await;
        staged?;
        self.publish(&output).await
    }

    async fn stage_single(&self, uri: &str, temp: &Path, output: &Path) -> ReelsmithResult<()> {
        self.download(uri, temp).await?;
        tokio::fs::rename(temp, output).await.map_err(|e| {
            MergeError::new(MergeErrorKind::Io(format!(
                "rename {} to {}: {}",
                temp.display(),
                output.display(),
                e
            )))
            .into()
        })
    }

    async fn merge_many(
        &self,
        uris: &[String],
        total_duration: u32,
    ) -> ReelsmithResult<FinalAsset> {
        info!(clips = uris.len(), "Merging segments");
        let output = self.local_path(&merged_output_name(total_duration));
        let mut temps = Vec::with_capacity(uris.len());

        let rendered = self.render(uris, &output, &mut temps).await;
        for temp in &temps {
            remove_quietly(temp).await;
        }
        debug!(removed = temps.len(), "Removed segment downloads");

        if let Err(e) = rendered {
            remove_quietly(&output).await;
            return Err(e);
        }
        self.publish(&output).await
    }

    async fn render(
        &self,
        uris: &[String],
        output: &Path,
        temps: &mut Vec<PathBuf>,
    ) -> ReelsmithResult<()> {
        for (i, uri) in uris.iter().enumerate() {
            let temp = self.local_path(&segment_temp_name(i + 1));
            temps.push(temp.clone());
            self.download(uri, &temp).await?;
            debug!(index = i + 1, of = uris.len(), "Downloaded segment");
        }
        self.concatenator.concatenate(temps, output).await
    }

    /// Upload the local deliverable, then keep or delete it.
    async fn publish(&self, output: &Path) -> ReelsmithResult<FinalAsset> {
        match self.storage.upload_final(output).await {
            Ok(asset) => {
                if self.config.testing_mode {
                    info!(path = %output.display(), "Testing mode, keeping local file");
                } else {
                    remove_quietly(output).await;
                }
                Ok(asset)
            }
            Err(e) => {
                remove_quietly(output).await;
                Err(MergeError::new(MergeErrorKind::Upload(e.to_string())).into())
            }
        }
    }

    async fn download(&self, uri: &str, local: &Path) -> ReelsmithResult<()> {
        self.storage.download(uri, local).await.map_err(|e| {
            MergeError::new(MergeErrorKind::Download {
                uri: uri.to_string(),
                message: e.to_string(),
            })
            .into()
        })
    }

    async fn prepare_work_dir(&self) -> ReelsmithResult<()> {
        let dir = &self.config.work_dir;
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            MergeError::new(MergeErrorKind::Io(format!("{}: {}", dir.display(), e))).into()
        })
    }

    fn local_path(&self, name: &str) -> PathBuf {
        self.config.work_dir.join(name)
    }

    /// Remove leftover temp files from this or earlier crashed runs.
    pub async fn sweep_orphans(&self) {
        let dir = &self.config.work_dir;
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Could not scan for orphaned temp files");
                return;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "Orphan sweep interrupted");
                    break;
                }
            };
            let name = entry.file_name().to_string_lossy().to_string();
            if !TEMP_FILE_PREFIXES.iter().any(|p| name.starts_with(p)) {
                continue;
            }
            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => info!(file = %name, "Removed orphaned temp file"),
                Err(e) => warn!(file = %name, error = %e, "Could not remove orphaned temp file"),
            }
        }
    }
}

/// Delete a file, ignoring absence and logging anything else.
async fn remove_quietly(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "Removed local file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Could not remove local file"),
    }
}
