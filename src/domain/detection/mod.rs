//! Signal-fusion scam detection.
//!
//! Detection combines weighted keyword lexicons, category regex patterns,
//! combination multipliers, demand detection, legitimacy deductions, and
//! safe-pattern overrides into a single confidence score. The pipeline is
//! deterministic and pure.

mod detector;
mod language;
pub mod lexicon;
mod verdict;

pub use detector::SignalDetector;
pub use language::{detect_language, sophistication_score, Language};
pub use verdict::{DetectionVerdict, RiskBreakdown, ScamCategory, ThreatLevel};
