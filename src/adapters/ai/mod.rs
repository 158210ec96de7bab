//! Generation provider adapters.

mod fallback_chain;
mod gemini_provider;
mod groq_provider;
mod health;
pub mod mock_provider;

pub use fallback_chain::{FallbackChain, GeneratedReply};
pub use gemini_provider::{GeminiConfig, GeminiProvider};
pub use groq_provider::{GroqConfig, GroqProvider};
pub use health::{ProviderCircuit, ProviderHealth, ProviderHealthRegistry, ProviderStatus};
pub use mock_provider::{MockError, MockGenerationProvider};
