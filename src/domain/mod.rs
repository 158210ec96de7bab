//! Domain layer - pure detection, extraction, and conversation logic.
//!
//! Everything here is deterministic given its inputs (aside from explicitly
//! injected randomness for persona selection and response variation) and free
//! of I/O. Network calls live behind ports, implemented in `adapters`.

pub mod behavior;
pub mod conversation;
pub mod detection;
pub mod extraction;
pub mod foundation;
