//! Circuit breaker port for generation provider resilience.
//!
//! A provider that keeps timing out must not slow every turn down. After
//! enough consecutive failures the circuit opens and the chain skips the
//! provider until the cooldown elapses.

use std::time::Duration;

/// Circuit states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation, requests flow through.
    Closed,
    /// Too many failures, requests are skipped without calling the provider.
    Open,
    /// Cooldown elapsed, the next request probes whether the provider
    /// recovered.
    HalfOpen,
}

impl CircuitState {
    pub fn allows_requests(&self) -> bool {
        matches!(self, CircuitState::Closed | CircuitState::HalfOpen)
    }
}

/// Configuration for circuit breaker behavior.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before the circuit opens.
    pub failure_threshold: u32,
    /// How long an open circuit blocks requests before probing again.
    pub cooldown: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        CircuitBreakerConfig {
            failure_threshold: 3,
            cooldown: Duration::from_secs(60),
        }
    }
}

/// Port for per-provider circuit breaking.
pub trait CircuitBreaker: Send + Sync {
    fn state(&self) -> CircuitState;

    /// True when the provider should receive the next request.
    fn should_allow(&self) -> bool;

    /// Clears the failure streak and closes the circuit.
    fn record_success(&self);

    /// Counts toward the failure threshold; reopens a half-open circuit.
    fn record_failure(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_circuit_blocks_requests() {
        assert!(CircuitState::Closed.allows_requests());
        assert!(CircuitState::HalfOpen.allows_requests());
        assert!(!CircuitState::Open.allows_requests());
    }

    #[test]
    fn default_config_matches_provider_budgets() {
        let config = CircuitBreakerConfig::default();
        assert_eq!(config.failure_threshold, 3);
        assert_eq!(config.cooldown, Duration::from_secs(60));
    }
}
