//! Provider health tracking and circuit breaking.
//!
//! Every generation call reports its outcome here. The fallback chain reads
//! the same registry through [`ProviderCircuit`] to skip providers that are
//! currently failing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::ports::{CircuitBreaker, CircuitBreakerConfig, CircuitState};

/// Last observed state of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderStatus {
    #[default]
    Unknown,
    Healthy,
    Failing,
}

/// Rolling health stats for one provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderHealth {
    pub status: ProviderStatus,
    pub consecutive_failures: u32,
    pub last_failure: Option<Instant>,
    pub calls: u64,
    pub total_latency: Duration,
}

impl ProviderHealth {
    pub fn average_latency(&self) -> Option<Duration> {
        if self.calls == 0 {
            None
        } else {
            Some(self.total_latency / self.calls as u32)
        }
    }
}

/// Shared health registry keyed by provider name.
#[derive(Debug, Default)]
pub struct ProviderHealthRegistry {
    providers: Mutex<HashMap<String, ProviderHealth>>,
}

impl ProviderHealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, provider: &str, latency: Duration) {
        let mut providers = self.providers.lock().unwrap();
        let health = providers.entry(provider.to_string()).or_default();
        health.status = ProviderStatus::Healthy;
        health.consecutive_failures = 0;
        health.calls += 1;
        health.total_latency += latency;
    }

    pub fn record_failure(&self, provider: &str) {
        let mut providers = self.providers.lock().unwrap();
        let health = providers.entry(provider.to_string()).or_default();
        health.status = ProviderStatus::Failing;
        health.consecutive_failures += 1;
        health.last_failure = Some(Instant::now());
    }

    pub fn snapshot(&self, provider: &str) -> ProviderHealth {
        self.providers
            .lock()
            .unwrap()
            .get(provider)
            .cloned()
            .unwrap_or_default()
    }

    pub fn snapshot_all(&self) -> HashMap<String, ProviderHealth> {
        self.providers.lock().unwrap().clone()
    }
}

/// Circuit breaker view over one provider's registry entry.
pub struct ProviderCircuit {
    registry: Arc<ProviderHealthRegistry>,
    provider: String,
    config: CircuitBreakerConfig,
}

impl ProviderCircuit {
    pub fn new(
        registry: Arc<ProviderHealthRegistry>,
        provider: impl Into<String>,
        config: CircuitBreakerConfig,
    ) -> Self {
        ProviderCircuit {
            registry,
            provider: provider.into(),
            config,
        }
    }
}

impl CircuitBreaker for ProviderCircuit {
    fn state(&self) -> CircuitState {
        let health = self.registry.snapshot(&self.provider);
        if health.consecutive_failures < self.config.failure_threshold {
            return CircuitState::Closed;
        }
        match health.last_failure {
            Some(at) if at.elapsed() < self.config.cooldown => CircuitState::Open,
            _ => CircuitState::HalfOpen,
        }
    }

    fn should_allow(&self) -> bool {
        self.state().allows_requests()
    }

    fn record_success(&self) {
        self.registry.record_success(&self.provider, Duration::ZERO);
    }

    fn record_failure(&self) {
        self.registry.record_failure(&self.provider);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_tracks_latency_and_streaks() {
        let registry = ProviderHealthRegistry::new();
        registry.record_success("groq", Duration::from_millis(100));
        registry.record_success("groq", Duration::from_millis(300));

        let health = registry.snapshot("groq");
        assert_eq!(health.status, ProviderStatus::Healthy);
        assert_eq!(health.calls, 2);
        assert_eq!(health.average_latency(), Some(Duration::from_millis(200)));

        registry.record_failure("groq");
        let health = registry.snapshot("groq");
        assert_eq!(health.status, ProviderStatus::Failing);
        assert_eq!(health.consecutive_failures, 1);
    }

    #[test]
    fn success_clears_failure_streak() {
        let registry = ProviderHealthRegistry::new();
        registry.record_failure("gemini");
        registry.record_failure("gemini");
        registry.record_success("gemini", Duration::from_millis(50));
        assert_eq!(registry.snapshot("gemini").consecutive_failures, 0);
    }

    #[test]
    fn circuit_opens_after_threshold_failures() {
        let registry = Arc::new(ProviderHealthRegistry::new());
        let circuit = ProviderCircuit::new(
            registry.clone(),
            "groq",
            CircuitBreakerConfig::default(),
        );

        assert_eq!(circuit.state(), CircuitState::Closed);
        for _ in 0..3 {
            circuit.record_failure();
        }
        assert_eq!(circuit.state(), CircuitState::Open);
        assert!(!circuit.should_allow());

        circuit.record_success();
        assert_eq!(circuit.state(), CircuitState::Closed);
        assert!(circuit.should_allow());
    }

    #[test]
    fn stale_failures_move_circuit_to_half_open() {
        let registry = Arc::new(ProviderHealthRegistry::new());
        let circuit = ProviderCircuit::new(
            registry.clone(),
            "groq",
            CircuitBreakerConfig {
                failure_threshold: 1,
                cooldown: Duration::ZERO,
            },
        );
        circuit.record_failure();
        assert_eq!(circuit.state(), CircuitState::HalfOpen);
        assert!(circuit.should_allow());
    }

    #[test]
    fn unknown_provider_snapshot_is_default() {
        let registry = ProviderHealthRegistry::new();
        let health = registry.snapshot("never-seen");
        assert_eq!(health.status, ProviderStatus::Unknown);
        assert_eq!(health.calls, 0);
        assert!(health.average_latency().is_none());
    }
}
