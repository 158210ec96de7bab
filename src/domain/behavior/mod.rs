//! Behavioral analytics over the counterparty's side of a conversation.

mod consistency;
mod fingerprint;
mod frustration;
mod threat;

pub use consistency::{ConsistencyChecker, ConsistencyReport};
pub use fingerprint::{BehaviorAnalyzer, BehaviorFingerprint, BehaviorPattern, Tactic};
pub use frustration::FrustrationTracker;
pub use threat::{ConfidenceLabel, ThreatReport, ThreatScorer};
