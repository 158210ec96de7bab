//! Generation provider port.
//!
//! Abstracts the LLM services that produce persona replies so the engagement
//! pipeline never couples to a specific vendor API.

use async_trait::async_trait;

/// Port for reply generation backends.
///
/// Implementations connect to external LLM services and translate between
/// the provider-specific API and our request/response types. The rule-based
/// fallback also implements this trait so the provider chain can treat it
/// like any other backend.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generates a single completion for the prompt.
    async fn generate(&self, request: &GenerationRequest)
        -> Result<GenerationResponse, GenerationError>;

    /// Short stable identifier used in health tracking and logs.
    fn name(&self) -> &str;
}

/// Request for a persona reply.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        GenerationRequest {
            prompt: prompt.into(),
            max_tokens: 60,
            temperature: 0.85,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Raw completion from a provider, before sanitization.
#[derive(Debug, Clone)]
pub struct GenerationResponse {
    pub content: String,
    pub model: String,
}

/// Generation provider errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("provider not configured")]
    NotConfigured,

    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("reply rejected: {reason}")]
    ReplyRejected { reason: String },
}

impl GenerationError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        GenerationError::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        GenerationError::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        GenerationError::Parse(message.into())
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        GenerationError::ReplyRejected {
            reason: reason.into(),
        }
    }

    /// True when the next provider in the chain should be tried.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            GenerationError::AuthenticationFailed | GenerationError::InvalidRequest(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_works() {
        let request = GenerationRequest::new("prompt text")
            .with_max_tokens(50)
            .with_temperature(0.9);
        assert_eq!(request.prompt, "prompt text");
        assert_eq!(request.max_tokens, 50);
        assert_eq!(request.temperature, 0.9);
    }

    #[test]
    fn default_budget_fits_short_replies() {
        let request = GenerationRequest::new("p");
        assert_eq!(request.max_tokens, 60);
        assert_eq!(request.temperature, 0.85);
    }

    #[test]
    fn retryable_classification() {
        assert!(GenerationError::RateLimited { retry_after_secs: 30 }.is_retryable());
        assert!(GenerationError::unavailable("down").is_retryable());
        assert!(GenerationError::network("reset").is_retryable());
        assert!(GenerationError::Timeout { timeout_ms: 2000 }.is_retryable());
        assert!(GenerationError::NotConfigured.is_retryable());
        assert!(GenerationError::rejected("broke character").is_retryable());

        assert!(!GenerationError::AuthenticationFailed.is_retryable());
        assert!(!GenerationError::InvalidRequest("bad".into()).is_retryable());
    }
}
