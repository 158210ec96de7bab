//! Application layer: use cases orchestrating the domain through the ports.

mod engage;

pub use engage::{EngageError, EngagementHandler, EngagementOutcome, EngagementRequest};
