//! Groq provider - OpenAI-compatible chat completions API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GroqConfig::new(api_key)
//!     .with_model("llama-3.1-8b-instant")
//!     .with_timeout(Duration::from_millis(2000));
//!
//! let provider = GroqProvider::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{
    GenerationError, GenerationProvider, GenerationRequest, GenerationResponse,
};

/// Configuration for the Groq provider.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GroqConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "llama-3.1-8b-instant".to_string(),
            base_url: "https://api.groq.com/openai".to_string(),
            timeout: Duration::from_millis(2000),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Groq chat completions provider.
pub struct GroqProvider {
    config: GroqConfig,
    client: Client,
    name: String,
}

impl GroqProvider {
    pub fn new(config: GroqConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");
        let name = format!("groq:{}", config.model);

        Self { config, client, name }
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.base_url)
    }

    fn to_groq_request(&self, request: &GenerationRequest) -> GroqChatRequest {
        GroqChatRequest {
            model: self.config.model.clone(),
            messages: vec![GroqMessage {
                role: "user".to_string(),
                content: request.prompt.clone(),
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: 0.9,
        }
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, GenerationError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(GenerationError::AuthenticationFailed),
            429 => Err(GenerationError::RateLimited { retry_after_secs: 60 }),
            400 => Err(GenerationError::InvalidRequest(error_body)),
            500..=599 => Err(GenerationError::unavailable(format!(
                "Server error {status}: {error_body}"
            ))),
            _ => Err(GenerationError::network(format!(
                "Unexpected status {status}: {error_body}"
            ))),
        }
    }

    fn map_transport_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            GenerationError::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            }
        } else if e.is_connect() {
            GenerationError::network(format!("Connection failed: {e}"))
        } else {
            GenerationError::network(e.to_string())
        }
    }
}

#[async_trait]
impl GenerationProvider for GroqProvider {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let body = self.to_groq_request(request);

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let response = self.handle_response_status(response).await?;
        let parsed: GroqChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::parse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| GenerationError::parse("response had no choices"))?;

        Ok(GenerationResponse {
            content,
            model: self.config.model.clone(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Serialize)]
struct GroqChatRequest {
    model: String,
    messages: Vec<GroqMessage>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct GroqMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct GroqChatResponse {
    choices: Vec<GroqChoice>,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqResponseMessage,
}

#[derive(Debug, Deserialize)]
struct GroqResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_works() {
        let config = GroqConfig::new("gsk_test")
            .with_model("llama-3.3-70b-versatile")
            .with_timeout(Duration::from_millis(2500));
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert_eq!(config.base_url, "https://api.groq.com/openai");
    }

    #[test]
    fn provider_name_includes_model() {
        let provider = GroqProvider::new(GroqConfig::new("gsk_test"));
        assert_eq!(provider.name(), "groq:llama-3.1-8b-instant");
    }

    #[test]
    fn request_serializes_openai_shape() {
        let provider = GroqProvider::new(GroqConfig::new("gsk_test"));
        let body = provider.to_groq_request(&GenerationRequest::new("hello"));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "llama-3.1-8b-instant");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
        assert_eq!(json["max_tokens"], 60);
    }

    #[test]
    fn response_parses_first_choice() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"Haan beta?"}}]}"#;
        let parsed: GroqChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "Haan beta?");
    }
}
