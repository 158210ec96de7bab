//! Ports: interfaces between the domain and the outside world.
//!
//! The engagement pipeline depends only on these traits; adapters provide
//! the concrete LLM clients, circuit breakers, and stores.

mod circuit_breaker;
mod generation_provider;
mod session_store;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use generation_provider::{
    GenerationError, GenerationProvider, GenerationRequest, GenerationResponse,
};
pub use session_store::{EntityLedger, SessionStore, SessionStoreError};
