//! Detection engine configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Engine tunables.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Confidence at or above which a message is flagged as a scam.
    #[serde(default = "default_scam_threshold")]
    pub scam_threshold: f64,

    /// How many past replies are kept for deduplication.
    #[serde(default = "default_reply_memory")]
    pub reply_memory: usize,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.scam_threshold) {
            return Err(ValidationError::InvalidThreshold);
        }
        if self.reply_memory == 0 {
            return Err(ValidationError::InvalidReplyMemory);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scam_threshold: default_scam_threshold(),
            reply_memory: default_reply_memory(),
        }
    }
}

fn default_scam_threshold() -> f64 {
    0.35
}

fn default_reply_memory() -> usize {
    15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.scam_threshold, 0.35);
        assert_eq!(config.reply_memory, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn out_of_range_threshold_fails() {
        let config = EngineConfig {
            scam_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
