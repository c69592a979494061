//! Clip concatenation with the ffmpeg concat demuxer.

use async_trait::async_trait;
use derive_getters::Getters;
use reelsmith_config::MergeConfig;
use reelsmith_error::{MergeError, MergeErrorKind, ReelsmithResult};
use reelsmith_interface::ClipConcatenator;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error, info, instrument, warn};

/// Manifest file written beside the output for the concat demuxer.
pub const MANIFEST_FILE_NAME: &str = "temp_segment_manifest.txt";

const STDERR_TAIL_CHARS: usize = 2000;

/// Straight concatenation re-encoded at a fixed frame rate, codec and bitrate.
///
/// The child process is killed if the render future is dropped, and the
/// manifest is removed whether or not the render succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct FfmpegConcatenator {
    /// Executable name or path
    binary: String,
    /// Output frame rate
    fps: u32,
    /// Video codec
    video_codec: String,
    /// Encoder preset
    preset: String,
    /// Video bitrate
    bitrate: String,
    /// Audio codec
    audio_codec: String,
    /// Encoder threads
    threads: u32,
}

impl FfmpegConcatenator {
    /// Build from the merge section.
    pub fn from_config(config: &MergeConfig) -> Self {
        Self {
            binary: config.ffmpeg_binary.clone(),
            fps: config.fps,
            video_codec: config.video_codec.clone(),
            preset: config.preset.clone(),
            bitrate: config.bitrate.clone(),
            audio_codec: config.audio_codec.clone(),
            threads: config.threads,
        }
    }

    /// Contents of a concat manifest, one `file '<path>'` line per input.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsmith_pipeline::FfmpegConcatenator;
    /// use std::path::PathBuf;
    ///
    /// let manifest = FfmpegConcatenator::manifest(&[
    ///     PathBuf::from("/work/temp_segment_1.mp4"),
    ///     PathBuf::from("/work/it's.mp4"),
    /// ]);
    /// assert_eq!(
    ///     manifest,
    ///     "file '/work/temp_segment_1.mp4'\nfile '/work/it'\\''s.mp4'\n"
    /// );
    /// ```
    pub fn manifest(inputs: &[PathBuf]) -> String {
        inputs
            .iter()
            .map(|path| {
                let escaped = path.to_string_lossy().replace('\'', r"'\''");
                format!("file '{}'\n", escaped)
            })
            .collect()
    }

    /// Command line arguments for one render.
    pub fn arguments(&self, manifest: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-y",
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "concat",
            "-safe",
            "0",
            "-i",
        ]
        .into_iter()
        .map(OsString::from)
        .collect();
        args.push(manifest.as_os_str().to_owned());
        for (flag, value) in [
            ("-r", self.fps.to_string()),
            ("-c:v", self.video_codec.clone()),
            ("-preset", self.preset.clone()),
            ("-b:v", self.bitrate.clone()),
            ("-c:a", self.audio_codec.clone()),
            ("-threads", self.threads.to_string()),
        ] {
            args.push(OsString::from(flag));
            args.push(OsString::from(value));
        }
        args.push(output.as_os_str().to_owned());
        args
    }
}

#[async_trait]
impl ClipConcatenator for FfmpegConcatenator {
    #[instrument(skip(self, inputs), fields(clips = inputs.len(), output = %output.display()))]
    async fn concatenate(&self, inputs: &[PathBuf], output: &Path) -> ReelsmithResult<()> {
        if inputs.is_empty() {
            return Err(MergeError::new(MergeErrorKind::NoSegments).into());
        }

        let absolute: Vec<PathBuf> = inputs
            .iter()
            .map(|p| std::path::absolute(p).unwrap_or_else(|_| p.clone()))
            .collect();
        let manifest_path = output.with_file_name(MANIFEST_FILE_NAME);
        tokio::fs::write(&manifest_path, Self::manifest(&absolute))
            .await
            .map_err(|e| {
                MergeError::new(MergeErrorKind::Io(format!(
                    "{}: {}",
                    manifest_path.display(),
                    e
                )))
            })?;
        debug!(manifest = %manifest_path.display(), "Manifest written");

        let result = Command::new(&self.binary)
            .args(self.arguments(&manifest_path, output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await;

        if let Err(e) = tokio::fs::remove_file(&manifest_path).await {
            warn!(manifest = %manifest_path.display(), error = %e, "Could not remove manifest");
        }

        let output_status = result.map_err(|e| {
            error!(binary = %self.binary, error = %e, "Failed to launch ffmpeg");
            MergeError::new(MergeErrorKind::Launch(format!("{}: {}", self.binary, e)))
        })?;

        if !output_status.status.success() {
            let stderr = String::from_utf8_lossy(&output_status.stderr);
            let tail: String = stderr
                .chars()
                .rev()
                .take(STDERR_TAIL_CHARS)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            error!(status = %output_status.status, stderr = %tail, "ffmpeg render failed");
            return Err(MergeError::new(MergeErrorKind::Render(format!(
                "ffmpeg exited with {}: {}",
                output_status.status,
                tail.trim()
            )))
            .into());
        }

        info!(output = %output.display(), "Render complete");
        Ok(())
    }
}
