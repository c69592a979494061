//! Recording sleeper and concatenator.

use async_trait::async_trait;
use reelsmith_error::{MergeError, MergeErrorKind, ReelsmithResult};
use reelsmith_interface::{ClipConcatenator, Sleeper};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Sleeper that returns at once and remembers every requested delay.
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far.
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

/// Concatenator that joins file contents instead of rendering video.
///
/// Records the contents of its inputs at call time so tests can check
/// ordering after the temp files are gone. A failing instance writes a
/// partial output before reporting a render error.
#[derive(Default)]
pub struct RecordingConcatenator {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    fail: bool,
}

impl RecordingConcatenator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Input contents per call.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClipConcatenator for RecordingConcatenator {
    async fn concatenate(&self, inputs: &[PathBuf], output: &Path) -> ReelsmithResult<()> {
        let contents: Vec<String> = inputs
            .iter()
            .map(|path| std::fs::read_to_string(path).unwrap())
            .collect();
        self.calls.lock().unwrap().push(contents.clone());

        if self.fail {
            std::fs::write(output, "partial").unwrap();
            return Err(MergeError::new(MergeErrorKind::Render("forced failure".to_string())).into());
        }
        std::fs::write(output, contents.concat()).unwrap();
        Ok(())
    }
}
