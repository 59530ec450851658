/*!
 * Mock chat provider for testing.
 *
 * This module provides a scripted stand-in for the Ollama chat endpoint:
 * - `MockProvider::working()` - Answers with a schema-conforming translation
 * - `MockProvider::replying(..)` - Always answers with the given raw content
 * - `MockProvider::intermittent(n)` - Fails every nth request
 * - `MockProvider::failing()` - Always fails with an error
 *
 * Every request is recorded so tests can inspect prompts and settings.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::providers::ollama::{ChatRequest, ChatResponse};
use crate::translation::prompts::TEXT_HEADER;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Answers `{"translation": "[translated] <text>"}`
    Working,
    /// Answers with this raw message content
    Reply(String),
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Requests received so far, shared between clones
    requests: Arc<Mutex<Vec<ChatRequest>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&ChatRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that answers every request with `content`
    pub fn replying(content: impl Into<String>) -> Self {
        Self::new(MockBehavior::Reply(content.into()))
    }

    /// Create a mock that fails every `fail_every`th request
    ///
    /// A period of 0 is treated as 1, so every request fails.
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Set a custom response generator used by the working behavior
    pub fn with_custom_response(mut self, generator: fn(&ChatRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests received
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Copies of all received requests
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }

    /// The text a prompt asks to translate
    pub fn source_text(request: &ChatRequest) -> String {
        let prompt = request.prompt();
        match prompt.rfind(TEXT_HEADER) {
            Some(pos) => prompt[pos + TEXT_HEADER.len()..].to_string(),
            None => prompt.to_string(),
        }
    }

    /// Schema-conforming answer for `text`
    pub fn translation_json(text: &str) -> String {
        serde_json::json!({ "translation": text }).to_string()
    }

    fn working_reply(&self, request: &ChatRequest) -> String {
        match self.custom_response {
            Some(generator) => generator(request),
            None => Self::translation_json(&format!("[translated] {}", Self::source_text(request))),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = ChatRequest;
    type Response = ChatResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        let content = match &self.behavior {
            MockBehavior::Working => self.working_reply(&request),
            MockBehavior::Reply(content) => content.clone(),
            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    return Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    });
                }
                self.working_reply(&request)
            }
            MockBehavior::Failing => {
                return Err(ProviderError::ApiError {
                    message: "Simulated provider failure".to_string(),
                    status_code: 500,
                });
            }
        };

        Ok(ChatResponse::assistant(request.model.clone(), content))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Simulated connection failure".to_string())),
            _ => Ok(()),
        }
    }

    fn extract_text(response: &Self::Response) -> String {
        response.message.content.clone()
    }
}
