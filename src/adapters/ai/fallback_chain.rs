//! Ordered provider chain with per-provider timeouts and circuit breaking.
//!
//! Providers are tried fastest-first. A provider is skipped when its circuit
//! is open, and a slow call is abandoned at its timeout so one hung provider
//! never stalls the whole turn. When every provider fails the caller falls
//! back to rule-based replies.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::gemini_provider::{GeminiConfig, GeminiProvider};
use super::groq_provider::{GroqConfig, GroqProvider};
use super::health::{ProviderCircuit, ProviderHealthRegistry};
use crate::config::AiConfig;
use crate::domain::conversation::ReplySanitizer;
use crate::ports::{CircuitBreaker, CircuitBreakerConfig, GenerationProvider, GenerationRequest};

/// A sanitized reply together with the provider that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReply {
    pub text: String,
    pub provider: String,
}

struct ChainEntry {
    provider: Arc<dyn GenerationProvider>,
    timeout: Duration,
    circuit: ProviderCircuit,
}

/// Tries each configured provider in order until one yields a usable reply.
pub struct FallbackChain {
    entries: Vec<ChainEntry>,
    registry: Arc<ProviderHealthRegistry>,
}

impl Default for FallbackChain {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackChain {
    pub fn new() -> Self {
        FallbackChain {
            entries: Vec::new(),
            registry: Arc::new(ProviderHealthRegistry::new()),
        }
    }

    /// Builds the standard chain from configuration: fast Groq, large Groq,
    /// then both Gemini models. Providers without keys are left out.
    pub fn from_config(config: &AiConfig) -> Self {
        let mut chain = Self::new();

        if let Some(key) = config.groq_api_key.as_deref().filter(|k| !k.is_empty()) {
            chain = chain
                .with_provider(
                    Arc::new(GroqProvider::new(
                        GroqConfig::new(key)
                            .with_model(&config.groq_fast_model)
                            .with_timeout(config.fast_timeout()),
                    )),
                    config.fast_timeout(),
                )
                .with_provider(
                    Arc::new(GroqProvider::new(
                        GroqConfig::new(key)
                            .with_model(&config.groq_model)
                            .with_timeout(config.standard_timeout()),
                    )),
                    config.standard_timeout(),
                );
        }

        if let Some(key) = config.gemini_api_key.as_deref().filter(|k| !k.is_empty()) {
            chain = chain
                .with_provider(
                    Arc::new(GeminiProvider::new(
                        GeminiConfig::new(key)
                            .with_model(&config.gemini_model)
                            .with_timeout(config.gemini_timeout()),
                    )),
                    config.gemini_timeout(),
                )
                .with_provider(
                    Arc::new(GeminiProvider::new(
                        GeminiConfig::new(key)
                            .with_model(&config.gemini_fallback_model)
                            .with_timeout(config.gemini_timeout()),
                    )),
                    config.gemini_timeout(),
                );
        }

        chain
    }

    /// Appends a provider with its per-call timeout.
    pub fn with_provider(
        mut self,
        provider: Arc<dyn GenerationProvider>,
        timeout: Duration,
    ) -> Self {
        let circuit = ProviderCircuit::new(
            self.registry.clone(),
            provider.name().to_string(),
            CircuitBreakerConfig::default(),
        );
        self.entries.push(ChainEntry {
            provider,
            timeout,
            circuit,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn registry(&self) -> Arc<ProviderHealthRegistry> {
        self.registry.clone()
    }

    /// Runs the chain. Returns the first sanitized reply, or `None` when
    /// every provider is open, errors, times out, or breaks character.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        persona_name: &str,
    ) -> Option<GeneratedReply> {
        for entry in &self.entries {
            let name = entry.provider.name();
            if !entry.circuit.should_allow() {
                debug!(provider = name, "circuit open, skipping provider");
                continue;
            }

            let started = Instant::now();
            let outcome =
                tokio::time::timeout(entry.timeout, entry.provider.generate(request)).await;

            match outcome {
                Err(_) => {
                    warn!(provider = name, timeout_ms = entry.timeout.as_millis() as u64,
                        "provider timed out");
                    self.registry.record_failure(name);
                }
                Ok(Err(err)) => {
                    warn!(provider = name, error = %err, "provider call failed");
                    self.registry.record_failure(name);
                }
                Ok(Ok(response)) => {
                    let latency = started.elapsed();
                    match ReplySanitizer::clean(&response.content, persona_name) {
                        Some(text) => {
                            self.registry.record_success(name, latency);
                            debug!(provider = name, latency_ms = latency.as_millis() as u64,
                                "provider produced reply");
                            return Some(GeneratedReply {
                                text,
                                provider: name.to_string(),
                            });
                        }
                        None => {
                            // The service is healthy even when the model
                            // breaks character; don't trip the circuit.
                            self.registry.record_success(name, latency);
                            debug!(provider = name, "reply rejected by sanitizer");
                        }
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::mock_provider::{MockError, MockGenerationProvider};
    use crate::adapters::ai::ProviderStatus;

    fn request() -> GenerationRequest {
        GenerationRequest::new("prompt")
    }

    #[tokio::test]
    async fn first_healthy_provider_wins() {
        let primary = MockGenerationProvider::named("primary").with_response("Haan, bolo?");
        let secondary = MockGenerationProvider::named("secondary").with_response("unused");
        let chain = FallbackChain::new()
            .with_provider(Arc::new(primary), Duration::from_secs(1))
            .with_provider(Arc::new(secondary.clone()), Duration::from_secs(1));

        let reply = chain.generate(&request(), "Sharmila Aunty").await.unwrap();
        assert_eq!(reply.text, "Haan, bolo?");
        assert_eq!(reply.provider, "primary");
        assert_eq!(secondary.call_count(), 0);
    }

    #[tokio::test]
    async fn failures_cascade_to_the_next_provider() {
        let failing = MockGenerationProvider::named("failing").with_error(MockError::Unavailable {
            message: "down".to_string(),
        });
        let backup = MockGenerationProvider::named("backup").with_response("Kaun bol raha?");
        let chain = FallbackChain::new()
            .with_provider(Arc::new(failing), Duration::from_secs(1))
            .with_provider(Arc::new(backup), Duration::from_secs(1));

        let reply = chain.generate(&request(), "Ramaiah").await.unwrap();
        assert_eq!(reply.provider, "backup");
        assert_eq!(
            chain.registry().snapshot("failing").consecutive_failures,
            1
        );
    }

    #[tokio::test]
    async fn slow_provider_is_abandoned_at_timeout() {
        let slow = MockGenerationProvider::named("slow")
            .with_response("too late")
            .with_delay(Duration::from_millis(200));
        let fast = MockGenerationProvider::named("fast").with_response("In time");
        let chain = FallbackChain::new()
            .with_provider(Arc::new(slow), Duration::from_millis(20))
            .with_provider(Arc::new(fast), Duration::from_secs(1));

        let reply = chain.generate(&request(), "Rajesh Kumar").await.unwrap();
        assert_eq!(reply.provider, "fast");
        assert_eq!(chain.registry().snapshot("slow").status, ProviderStatus::Failing);
    }

    #[tokio::test]
    async fn open_circuit_skips_provider_without_calling_it() {
        let flaky = MockGenerationProvider::named("flaky");
        let backup = MockGenerationProvider::named("backup")
            .with_response("Reply one")
            .with_response("Reply two");
        let chain = FallbackChain::new()
            .with_provider(Arc::new(flaky.clone()), Duration::from_secs(1))
            .with_provider(Arc::new(backup), Duration::from_secs(1));

        for _ in 0..3 {
            chain.registry().record_failure("flaky");
        }

        let reply = chain.generate(&request(), "Priya Sharma").await.unwrap();
        assert_eq!(reply.provider, "backup");
        assert_eq!(flaky.call_count(), 0);
    }

    #[tokio::test]
    async fn character_break_falls_through_without_tripping_circuit() {
        let breaking = MockGenerationProvider::named("breaking")
            .with_response("As an AI language model, I cannot do that.");
        let backup = MockGenerationProvider::named("backup").with_response("Theek hai beta");
        let chain = FallbackChain::new()
            .with_provider(Arc::new(breaking), Duration::from_secs(1))
            .with_provider(Arc::new(backup), Duration::from_secs(1));

        let reply = chain.generate(&request(), "Sharmila Aunty").await.unwrap();
        assert_eq!(reply.provider, "backup");
        assert_eq!(chain.registry().snapshot("breaking").consecutive_failures, 0);
    }

    #[tokio::test]
    async fn exhausted_chain_returns_none() {
        let failing = MockGenerationProvider::named("only").with_error(MockError::Network {
            message: "reset".to_string(),
        });
        let chain =
            FallbackChain::new().with_provider(Arc::new(failing), Duration::from_secs(1));

        assert!(chain.generate(&request(), "Venkat Rao").await.is_none());
    }

    #[test]
    fn config_without_keys_builds_empty_chain() {
        let chain = FallbackChain::from_config(&AiConfig::default());
        assert!(chain.is_empty());
    }

    #[test]
    fn config_with_both_keys_builds_four_providers() {
        let config = AiConfig {
            groq_api_key: Some("gsk_x".to_string()),
            gemini_api_key: Some("ai_x".to_string()),
            ..Default::default()
        };
        let chain = FallbackChain::from_config(&config);
        assert_eq!(chain.entries.len(), 4);
    }
}
