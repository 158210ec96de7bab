//! Mock generation provider for testing.
//!
//! Configurable to return queued responses, simulate delays, or inject
//! errors, so chain and pipeline tests run without real LLM APIs.
//!
//! # Example
//!
//! ```ignore
//! let provider = MockGenerationProvider::named("mock")
//!     .with_response("Haan beta, which OTP?")
//!     .with_delay(Duration::from_millis(100));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    GenerationError, GenerationProvider, GenerationRequest, GenerationResponse,
};

/// A configured mock response.
#[derive(Debug, Clone)]
enum MockOutcome {
    Success(String),
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_ms: u64 },
}

impl From<MockError> for GenerationError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => {
                GenerationError::RateLimited { retry_after_secs }
            }
            MockError::Unavailable { message } => GenerationError::unavailable(message),
            MockError::AuthenticationFailed => GenerationError::AuthenticationFailed,
            MockError::Network { message } => GenerationError::network(message),
            MockError::Timeout { timeout_ms } => GenerationError::Timeout { timeout_ms },
        }
    }
}

/// Mock generation provider.
#[derive(Debug, Clone)]
pub struct MockGenerationProvider {
    name: String,
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockGenerationProvider {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful response.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(MockOutcome::Success(content.into()));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: MockError) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(MockOutcome::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.calls.lock().unwrap().last().map(|r| r.prompt.clone())
    }

    fn next_outcome(&self) -> MockOutcome {
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockOutcome::Success("Mock response from provider".to_string()))
    }
}

#[async_trait]
impl GenerationProvider for MockGenerationProvider {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        self.calls.lock().unwrap().push(request.clone());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_outcome() {
            MockOutcome::Success(content) => Ok(GenerationResponse {
                content,
                model: format!("{}-model", self.name),
            }),
            MockOutcome::Error(err) => Err(err.into()),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_responses_in_order() {
        let provider = MockGenerationProvider::named("mock")
            .with_response("First")
            .with_response("Second");

        let request = GenerationRequest::new("prompt");
        assert_eq!(provider.generate(&request).await.unwrap().content, "First");
        assert_eq!(provider.generate(&request).await.unwrap().content, "Second");
        // Exhausted queue falls back to the default.
        assert_eq!(
            provider.generate(&request).await.unwrap().content,
            "Mock response from provider"
        );
    }

    #[tokio::test]
    async fn returns_configured_error() {
        let provider = MockGenerationProvider::named("mock")
            .with_error(MockError::RateLimited { retry_after_secs: 30 });

        let err = provider
            .generate(&GenerationRequest::new("prompt"))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(err, GenerationError::RateLimited { retry_after_secs: 30 }));
    }

    #[tokio::test]
    async fn tracks_calls_and_prompts() {
        let provider = MockGenerationProvider::named("mock").with_response("ok then");
        assert_eq!(provider.call_count(), 0);

        provider
            .generate(&GenerationRequest::new("who is this?"))
            .await
            .unwrap();
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.last_prompt().as_deref(), Some("who is this?"));
    }

    #[tokio::test]
    async fn respects_delay() {
        let provider = MockGenerationProvider::named("mock")
            .with_response("slow")
            .with_delay(Duration::from_millis(50));

        let start = std::time::Instant::now();
        provider.generate(&GenerationRequest::new("p")).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
