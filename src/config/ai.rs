//! Generation provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Generation provider configuration.
///
/// All keys are optional. With no keys configured the engine still runs and
/// answers from the rule-based persona pools.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Groq API key
    pub groq_api_key: Option<String>,

    /// Gemini API key
    pub gemini_api_key: Option<String>,

    /// Fast Groq model tried first
    #[serde(default = "default_groq_fast_model")]
    pub groq_fast_model: String,

    /// Larger Groq model tried second
    #[serde(default = "default_groq_model")]
    pub groq_model: String,

    /// Primary Gemini model
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Fallback Gemini model
    #[serde(default = "default_gemini_fallback_model")]
    pub gemini_fallback_model: String,

    /// Per-call timeout for the fast Groq model, in milliseconds
    #[serde(default = "default_fast_timeout_ms")]
    pub fast_timeout_ms: u64,

    /// Per-call timeout for the larger Groq model, in milliseconds
    #[serde(default = "default_standard_timeout_ms")]
    pub standard_timeout_ms: u64,

    /// Per-call timeout for Gemini models, in milliseconds
    #[serde(default = "default_gemini_timeout_ms")]
    pub gemini_timeout_ms: u64,
}

impl AiConfig {
    pub fn fast_timeout(&self) -> Duration {
        Duration::from_millis(self.fast_timeout_ms)
    }

    pub fn standard_timeout(&self) -> Duration {
        Duration::from_millis(self.standard_timeout_ms)
    }

    pub fn gemini_timeout(&self) -> Duration {
        Duration::from_millis(self.gemini_timeout_ms)
    }

    pub fn has_groq(&self) -> bool {
        self.groq_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    pub fn has_gemini(&self) -> bool {
        self.gemini_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.fast_timeout_ms == 0 || self.standard_timeout_ms == 0 || self.gemini_timeout_ms == 0
        {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            gemini_api_key: None,
            groq_fast_model: default_groq_fast_model(),
            groq_model: default_groq_model(),
            gemini_model: default_gemini_model(),
            gemini_fallback_model: default_gemini_fallback_model(),
            fast_timeout_ms: default_fast_timeout_ms(),
            standard_timeout_ms: default_standard_timeout_ms(),
            gemini_timeout_ms: default_gemini_timeout_ms(),
        }
    }
}

fn default_groq_fast_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_groq_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_fallback_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_fast_timeout_ms() -> u64 {
    2000
}

fn default_standard_timeout_ms() -> u64 {
    2500
}

fn default_gemini_timeout_ms() -> u64 {
    3000
}
