//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `SCAM_SENTRY` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use scam_sentry::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod engine;
mod error;

pub use ai::AiConfig;
pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};

use serde::Deserialize;

/// Root application configuration.
///
/// Every section has defaults, so the engine runs with no environment at
/// all: detection and extraction are fully local and reply generation falls
/// back to the rule-based personas.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Generation provider configuration (Groq/Gemini)
    #[serde(default)]
    pub ai: AiConfig,

    /// Detection engine tunables
    #[serde(default)]
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `SCAM_SENTRY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `SCAM_SENTRY__AI__GROQ_API_KEY=gsk_...` -> `ai.groq_api_key`
    /// - `SCAM_SENTRY__ENGINE__SCAM_THRESHOLD=0.4` -> `engine.scam_threshold`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SCAM_SENTRY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.engine.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global, keep these tests serial.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("SCAM_SENTRY__AI__GROQ_API_KEY");
        env::remove_var("SCAM_SENTRY__ENGINE__SCAM_THRESHOLD");
    }

    #[test]
    fn loads_with_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().expect("load should succeed with defaults");
        assert!(config.validate().is_ok());
        assert!(!config.ai.has_groq());
        assert_eq!(config.engine.scam_threshold, 0.35);
    }

    #[test]
    fn reads_prefixed_variables() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SCAM_SENTRY__AI__GROQ_API_KEY", "gsk_test");
        env::set_var("SCAM_SENTRY__ENGINE__SCAM_THRESHOLD", "0.5");
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("load should succeed");
        assert!(config.ai.has_groq());
        assert_eq!(config.engine.scam_threshold, 0.5);
    }
}
