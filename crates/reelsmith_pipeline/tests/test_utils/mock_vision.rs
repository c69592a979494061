//! Mock text/vision driver for testing.

use async_trait::async_trait;
use reelsmith_core::VisionRequest;
use reelsmith_error::{GeminiError, GeminiErrorKind, ReelsmithResult};
use reelsmith_interface::VisionDriver;
use std::sync::{Arc, Mutex};

/// A single mock response (text or error).
#[derive(Debug, Clone)]
pub enum MockResponse {
    Text(String),
    Error(GeminiErrorKind),
}

/// Mock vision driver answering from a script.
///
/// Calls past the end of the script fail with an `ApiRequest` error.
pub struct MockVisionDriver {
    responses: Vec<MockResponse>,
    requests: Arc<Mutex<Vec<VisionRequest>>>,
}

impl MockVisionDriver {
    /// Always answer with `text`.
    pub fn new_success(text: impl Into<String>) -> Self {
        Self::new_sequence(vec![MockResponse::Text(text.into()); 16])
    }

    /// Answer with each response in turn.
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        Self {
            responses,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of times generate() was called.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Requests received so far.
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<VisionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl VisionDriver for MockVisionDriver {
    async fn generate(&self, request: &VisionRequest) -> ReelsmithResult<String> {
        let index = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };

        match self.responses.get(index) {
            Some(MockResponse::Text(text)) => Ok(text.clone()),
            Some(MockResponse::Error(kind)) => Err(GeminiError::new(kind.clone()).into()),
            None => Err(GeminiError::new(GeminiErrorKind::ApiRequest(format!(
                "Mock sequence exhausted (call {} beyond {} responses)",
                index + 1,
                self.responses.len()
            )))
            .into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock-vision"
    }

    fn model_name(&self) -> &str {
        "mock-gemini"
    }
}
