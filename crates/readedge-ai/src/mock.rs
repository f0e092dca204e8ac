//! In-memory backend that replays queued responses; used by tests across
//! the workspace.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::{BackendError, GenerateRequest, GenerativeBackend};

type Scripted = Result<Option<String>, BackendError>;

#[derive(Default)]
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<GenerateRequest>>,
    delay: Option<Duration>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait this long before answering each request
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn push_text(&self, text: &str) {
        self.push(Ok(Some(text.to_string())));
    }

    pub fn push_empty(&self) {
        self.push(Ok(None));
    }

    pub fn push_error(&self, error: BackendError) {
        self.push(Err(error));
    }

    fn push(&self, response: Scripted) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn generate(&self, request: &GenerateRequest) -> Result<Option<String>, BackendError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| Err(BackendError::ApiError("no scripted response".to_string())))
    }
}
