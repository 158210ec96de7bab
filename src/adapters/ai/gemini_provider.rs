//! Gemini provider - Google generateContent API.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{
    GenerationError, GenerationProvider, GenerationRequest, GenerationResponse,
};

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout: Duration::from_millis(3000),
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

/// Gemini generateContent provider.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
    name: String,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");
        let name = format!("gemini:{}", config.model);

        Self { config, client, name }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    fn to_gemini_request(&self, request: &GenerationRequest) -> GeminiGenerateRequest {
        GeminiGenerateRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            },
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
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let body = self.to_gemini_request(request);

        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", self.config.api_key())])
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout {
                        timeout_ms: self.config.timeout.as_millis() as u64,
                    }
                } else if e.is_connect() {
                    GenerationError::network(format!("Connection failed: {e}"))
                } else {
                    GenerationError::network(e.to_string())
                }
            })?;

        let response = self.handle_response_status(response).await?;
        let parsed: GeminiGenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::parse(e.to_string()))?;

        let content = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| GenerationError::parse("response had no candidates"))?;

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
struct GeminiGenerateRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiGenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_url_embeds_model() {
        let provider = GeminiProvider::new(
            GeminiConfig::new("test-key").with_model("gemini-1.5-flash"),
        );
        assert_eq!(
            provider.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert_eq!(provider.name(), "gemini:gemini-1.5-flash");
    }

    #[test]
    fn request_serializes_generate_content_shape() {
        let provider = GeminiProvider::new(GeminiConfig::new("test-key"));
        let body = provider.to_gemini_request(&GenerationRequest::new("namaste"));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "namaste");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 60);
    }

    #[test]
    fn response_parses_first_candidate() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Kaun bol raha hai?"}]}}]}"#;
        let parsed: GeminiGenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.candidates[0].content.parts[0].text, "Kaun bol raha hai?");
    }

    #[test]
    fn empty_candidates_parse_cleanly() {
        let parsed: GeminiGenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
