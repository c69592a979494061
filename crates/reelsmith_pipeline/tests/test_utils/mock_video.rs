//! Mock video driver for testing.
//!
//! Finished operations write a small file at the request's `file://`
//! output location so the merger can download it afterwards.

use async_trait::async_trait;
use reelsmith_core::{GeneratedVideo, OperationHandle, OperationStatus, VideoRequest};
use reelsmith_error::{ReelsmithResult, VeoError, VeoErrorKind};
use reelsmith_interface::VideoDriver;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Scripted result of one poll. Once the script runs out every poll
/// reports [`MockPoll::Done`].
#[derive(Debug, Clone)]
pub enum MockPoll {
    Pending,
    Done,
    Failed { code: Option<i64>, message: String },
    Error(VeoErrorKind),
}

#[derive(Default)]
struct MockVideoState {
    polls: VecDeque<MockPoll>,
    submitted: Vec<VideoRequest>,
    extended: Vec<GeneratedVideo>,
    poll_count: usize,
    operations: HashMap<String, String>,
}

/// Mock video driver with scripted polls.
pub struct MockVideoDriver {
    state: Arc<Mutex<MockVideoState>>,
    extension_limit: Option<usize>,
}

impl MockVideoDriver {
    /// Every operation finishes on its first poll.
    pub fn new_success() -> Self {
        Self::new_sequence(Vec::new())
    }

    /// Consume `polls` in order across all operations.
    pub fn new_sequence(polls: Vec<MockPoll>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockVideoState {
                polls: polls.into(),
                ..MockVideoState::default()
            })),
            extension_limit: None,
        }
    }

    /// Reject every extension request after the first `limit`.
    pub fn with_extension_limit(mut self, limit: usize) -> Self {
        self.extension_limit = Some(limit);
        self
    }

    /// Generation requests received.
    pub fn submitted(&self) -> Vec<VideoRequest> {
        self.state.lock().unwrap().submitted.clone()
    }

    /// Extension sources received, including rejected ones.
    pub fn extended(&self) -> Vec<GeneratedVideo> {
        self.state.lock().unwrap().extended.clone()
    }

    /// Number of polls made.
    pub fn poll_count(&self) -> usize {
        self.state.lock().unwrap().poll_count
    }

    /// Submissions plus extensions plus polls.
    pub fn total_calls(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.submitted.len() + state.extended.len() + state.poll_count
    }
}

fn write_output(uri: &str, name: &str) {
    if let Some(path) = uri.strip_prefix("file://") {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, format!("video from {}\n", name)).unwrap();
    }
}

#[async_trait]
impl VideoDriver for MockVideoDriver {
    async fn submit(&self, request: &VideoRequest) -> ReelsmithResult<OperationHandle> {
        let mut state = self.state.lock().unwrap();
        state.submitted.push(request.clone());
        let name = format!("operations/generate-{}", state.submitted.len());
        state
            .operations
            .insert(name.clone(), request.output_uri().clone());
        Ok(OperationHandle::new(name, "mock-veo"))
    }

    async fn extend(&self, source: &GeneratedVideo) -> ReelsmithResult<OperationHandle> {
        let mut state = self.state.lock().unwrap();
        state.extended.push(source.clone());
        let step = state.extended.len();
        if self.extension_limit.is_some_and(|limit| step > limit) {
            return Err(VeoError::new(VeoErrorKind::HttpError {
                status_code: 400,
                message: "extension rejected".to_string(),
            })
            .into());
        }
        let name = format!("operations/extend-{}", step);
        let output = format!("{}.ext{}.mp4", source.uri().trim_end_matches(".mp4"), step);
        state.operations.insert(name.clone(), output);
        Ok(OperationHandle::new(name, "mock-veo"))
    }

    async fn poll(&self, operation: &OperationHandle) -> ReelsmithResult<OperationStatus> {
        let mut state = self.state.lock().unwrap();
        state.poll_count += 1;
        let next = state.polls.pop_front().unwrap_or(MockPoll::Done);

        match next {
            MockPoll::Pending => Ok(OperationStatus::Pending),
            MockPoll::Done => {
                let uri = state
                    .operations
                    .get(operation.name())
                    .cloned()
                    .unwrap_or_default();
                write_output(&uri, operation.name());
                Ok(OperationStatus::Succeeded(GeneratedVideo::new(
                    uri,
                    "video/mp4",
                )))
            }
            MockPoll::Failed { code, message } => Ok(OperationStatus::Failed { code, message }),
            MockPoll::Error(kind) => Err(VeoError::new(kind).into()),
        }
    }

    fn model_name(&self) -> &str {
        "mock-veo"
    }
}
