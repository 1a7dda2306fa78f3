use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

use crate::{core::LowLevelClient, error::AIError};

/// One scripted reply of a [`MockClient`].
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Returned verbatim from `ask_raw`
    Text(String),
    /// Returned as `AIError::Mock`
    Error(String),
    /// Sleep first, then return the text. Used to exercise timeouts.
    Delayed(Duration, String),
}

impl MockResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// Shared control surface of a [`MockClient`]: queue replies, inspect prompts.
#[derive(Debug, Default)]
pub struct MockHandle {
    responses: Mutex<VecDeque<MockResponse>>,
    prompts: Mutex<Vec<String>>,
}

impl MockHandle {
    pub fn add_response(&self, response: MockResponse) {
        self.responses.lock().unwrap_or_else(|p| p.into_inner()).push_back(response);
    }

    pub fn add_responses(&self, responses: impl IntoIterator<Item = MockResponse>) {
        self.responses
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .extend(responses);
    }

    /// Number of `ask_raw` calls seen so far.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    /// Every prompt received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn next(&self, prompt: String) -> Option<MockResponse> {
        self.prompts.lock().unwrap_or_else(|p| p.into_inner()).push(prompt);
        self.responses.lock().unwrap_or_else(|p| p.into_inner()).pop_front()
    }
}

/// Scripted client. Replies are served in queue order; an exhausted queue is an error.
#[derive(Debug, Clone)]
pub struct MockClient {
    handle: Arc<MockHandle>,
}

impl MockClient {
    pub fn new() -> (Self, Arc<MockHandle>) {
        let handle = Arc::new(MockHandle::default());
        (Self { handle: handle.clone() }, handle)
    }

    pub fn with_responses(responses: Vec<MockResponse>) -> (Self, Arc<MockHandle>) {
        let (client, handle) = Self::new();
        handle.add_responses(responses);
        (client, handle)
    }
}

#[async_trait]
impl LowLevelClient for MockClient {
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError> {
        let next = self.handle.next(prompt);
        debug!(target: "quizzify::clients", calls = self.handle.call_count(), "mock client called");
        match next {
            Some(MockResponse::Text(text)) => Ok(text),
            Some(MockResponse::Error(msg)) => Err(AIError::Mock(msg)),
            Some(MockResponse::Delayed(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            None => Err(AIError::Mock("no scripted response left".to_string())),
        }
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }
}

/// Mock client for testing that returns empty responses
#[derive(Debug, Clone, Default)]
pub struct MockVoid;

#[async_trait]
impl LowLevelClient for MockVoid {
    async fn ask_raw(&self, _prompt: String) -> Result<String, AIError> {
        Ok("{}".to_string())
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }
}
