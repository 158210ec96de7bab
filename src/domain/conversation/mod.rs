//! Conversation orchestration domain: messages, phases, personas, sessions,
//! reply hygiene, and prompt construction.

mod dedup;
mod message;
mod persona;
mod phase;
mod prompt;
mod sanitizer;
mod session;

pub use dedup::ResponseDeduplicator;
pub use message::{Message, MessageSender};
pub use persona::{Persona, PersonaKey};
pub use phase::ConversationPhase;
pub use prompt::PromptBuilder;
pub use sanitizer::{ReplySanitizer, MIN_REPLY_CHARS};
pub use session::{EngagementRecord, Session, SessionStatus};
