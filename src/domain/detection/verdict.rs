//! Detection verdict value objects.

use super::language::Language;
use super::lexicon::SignalCategory;
use crate::domain::foundation::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Scam category classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScamCategory {
    BankingFraud,
    UpiFraud,
    Phishing,
    LotteryScam,
    Impersonation,
    InvestmentFraud,
    JobScam,
    TechSupport,
    RomanceScam,
    Extortion,
    KycFraud,
    Unknown,
}

impl ScamCategory {
    /// Stable wire label, matching the serde representation.
    pub fn label(&self) -> &'static str {
        match self {
            ScamCategory::BankingFraud => "BANKING_FRAUD",
            ScamCategory::UpiFraud => "UPI_FRAUD",
            ScamCategory::Phishing => "PHISHING",
            ScamCategory::LotteryScam => "LOTTERY_SCAM",
            ScamCategory::Impersonation => "IMPERSONATION",
            ScamCategory::InvestmentFraud => "INVESTMENT_FRAUD",
            ScamCategory::JobScam => "JOB_SCAM",
            ScamCategory::TechSupport => "TECH_SUPPORT",
            ScamCategory::RomanceScam => "ROMANCE_SCAM",
            ScamCategory::Extortion => "EXTORTION",
            ScamCategory::KycFraud => "KYC_FRAUD",
            ScamCategory::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ScamCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Threat level buckets derived from confidence.
///
/// Declaration order gives the ordinal ranking: Safe < Low < Medium < High
/// < Critical, so `Ord` comparisons ratchet correctly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatLevel {
    #[default]
    Safe,
    Low,
    Medium,
    High,
    Critical,
}

impl ThreatLevel {
    /// Buckets a confidence score in [0, 1] into a threat level.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.8 {
            ThreatLevel::Critical
        } else if confidence >= 0.6 {
            ThreatLevel::High
        } else if confidence >= 0.4 {
            ThreatLevel::Medium
        } else if confidence >= 0.2 {
            ThreatLevel::Low
        } else {
            ThreatLevel::Safe
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ThreatLevel::Safe => "SAFE",
            ThreatLevel::Low => "LOW",
            ThreatLevel::Medium => "MEDIUM",
            ThreatLevel::High => "HIGH",
            ThreatLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-layer score breakdown exposed for observability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RiskBreakdown {
    /// Keyword layer score scaled to 0-100.
    pub keyword_score: f64,
    /// Pattern layer score scaled to 0-100.
    pub pattern_score: f64,
    pub combo_multiplier: f64,
    pub demand_multiplier: f64,
    /// Legitimacy deduction scaled to 0-100.
    pub legitimacy_deduction: f64,
    /// Final confidence scaled to 0-100.
    pub total_score: f64,
}

/// Outcome of running detection over a message plus its history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionVerdict {
    pub scam_detected: bool,
    pub category: ScamCategory,
    /// Final confidence in [0, 1], rounded to two decimal places.
    pub confidence: f64,
    pub threat_level: ThreatLevel,
    /// Matched keywords, capped at 20.
    pub detected_keywords: Vec<String>,
    pub detected_language: Language,
    pub known_scammer: bool,
    pub explanation: String,
    pub predicted_next_moves: Vec<String>,
    pub demand_detected: bool,
    /// Legitimacy deduction applied, in [0, 0.5].
    pub legitimacy_deduction: f64,
    /// Severity on a 0-100 scale.
    pub severity: u8,
    pub safe_pattern: bool,
    /// Counterparty sophistication estimate, 0-100.
    pub sophistication: u8,
    pub breakdown: RiskBreakdown,
    /// Count of matched keywords per triggered signal category.
    pub triggered_categories: BTreeMap<SignalCategory, usize>,
    pub analyzed_at: Timestamp,
}

impl DetectionVerdict {
    /// A zero verdict for input that could not be analyzed.
    pub fn empty(explanation: impl Into<String>) -> Self {
        DetectionVerdict {
            scam_detected: false,
            category: ScamCategory::Unknown,
            confidence: 0.0,
            threat_level: ThreatLevel::Safe,
            detected_keywords: Vec::new(),
            detected_language: Language::Unknown,
            known_scammer: false,
            explanation: explanation.into(),
            predicted_next_moves: Vec::new(),
            demand_detected: false,
            legitimacy_deduction: 0.0,
            severity: 0,
            safe_pattern: false,
            sophistication: 0,
            breakdown: RiskBreakdown::default(),
            triggered_categories: BTreeMap::new(),
            analyzed_at: Timestamp::now(),
        }
    }
}
