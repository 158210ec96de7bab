//! Combined threat scoring across every analysis signal.

use super::consistency::ConsistencyReport;
use super::fingerprint::BehaviorFingerprint;
use crate::domain::detection::DetectionVerdict;
use crate::domain::extraction::{EntitySet, LinkAnalysis, LinkRisk};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative confidence in the final threat score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLabel {
    VeryHigh,
    High,
    Moderate,
    Low,
}

impl ConfidenceLabel {
    fn from_score(score: u8) -> Self {
        if score >= 90 {
            ConfidenceLabel::VeryHigh
        } else if score >= 70 {
            ConfidenceLabel::High
        } else if score >= 40 {
            ConfidenceLabel::Moderate
        } else {
            ConfidenceLabel::Low
        }
    }
}

impl fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfidenceLabel::VeryHigh => "VERY_HIGH",
            ConfidenceLabel::High => "HIGH",
            ConfidenceLabel::Moderate => "MODERATE",
            ConfidenceLabel::Low => "LOW",
        })
    }
}

/// Final fused threat assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatReport {
    /// Fused score, 0-100.
    pub final_threat_score: u8,
    /// Detection confidence scaled to 0-100 before boosts.
    pub base_detection_score: u8,
    pub behavior_boost: u8,
    pub risk_factors: Vec<String>,
    pub threat_classification: &'static str,
    pub confidence_level: ConfidenceLabel,
}

/// Fuses detection, behavior, consistency, intelligence, and phishing
/// signals into one score.
pub struct ThreatScorer;

impl ThreatScorer {
    pub fn score(
        verdict: &DetectionVerdict,
        behavior: &BehaviorFingerprint,
        consistency: &ConsistencyReport,
        entities: &EntitySet,
        links: &[LinkAnalysis],
    ) -> ThreatReport {
        let base = (verdict.confidence * 100.0).round() as u8;

        let mut boost: u8 = 0;
        if behavior.tactics_count() >= 3 {
            boost += 5;
        }
        if behavior.aggression_score > 50 {
            boost += 5;
        }
        if behavior.urgency_escalation > 30 {
            boost += 5;
        }
        if behavior.pattern.is_severe() {
            boost += 5;
        }
        // A story that changes mid-conversation is its own confession.
        if consistency.story_changes > 0 {
            boost += 10;
        }
        let dangerous_link = links
            .iter()
            .any(|l| matches!(l.risk, LinkRisk::High | LinkRisk::Critical));
        if dangerous_link {
            boost += 10;
        }
        let intel_count = entities.total();
        if intel_count > 5 {
            boost += 5;
        }
        if intel_count > 10 {
            boost += 5;
        }

        let final_score = (base as u16 + boost as u16).min(100) as u8;

        let mut risk_factors = Vec::new();
        if behavior.tactics_count() >= 3 {
            risk_factors.push(format!(
                "{} manipulation tactics detected",
                behavior.tactics_count()
            ));
        }
        if behavior.urgency_escalation > 30 {
            risk_factors.push("Escalating urgency pattern".to_string());
        }
        if consistency.story_changes > 0 {
            risk_factors.push(format!(
                "{} story inconsistencies",
                consistency.story_changes
            ));
        }
        if links.iter().any(|l| l.risk == LinkRisk::Critical) {
            risk_factors.push("Critical phishing URL detected".to_string());
        }
        if intel_count > 5 {
            risk_factors.push(format!("{intel_count} intelligence items extracted"));
        }

        ThreatReport {
            final_threat_score: final_score,
            base_detection_score: base,
            behavior_boost: boost,
            risk_factors,
            threat_classification: Self::classify(final_score),
            confidence_level: ConfidenceLabel::from_score(final_score),
        }
    }

    fn classify(score: u8) -> &'static str {
        if score >= 80 {
            "CRITICAL"
        } else if score >= 60 {
            "HIGH"
        } else if score >= 35 {
            "MEDIUM"
        } else if score > 0 {
            "LOW"
        } else {
            "SAFE"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::behavior::{BehaviorAnalyzer, ConsistencyChecker};
    use crate::domain::conversation::Message;
    use crate::domain::detection::SignalDetector;
    use crate::domain::extraction::{EntityType, Extractor, PhishingAnalyzer};

    #[test]
    fn zero_signals_stay_safe() {
        let verdict = SignalDetector::analyze("see you at lunch", &[]);
        let messages = vec![Message::from_counterparty("see you at lunch")];
        let behavior = BehaviorAnalyzer::analyze(&messages);
        let consistency = ConsistencyChecker::check(&messages);
        let report = ThreatScorer::score(
            &verdict,
            &behavior,
            &consistency,
            &EntitySet::default(),
            &[],
        );
        assert_eq!(report.threat_classification, "SAFE");
        assert!(report.risk_factors.is_empty());
    }

    #[test]
    fn critical_link_and_inconsistency_boost_the_base() {
        let text = "This is SBI officer, pay rs 5000. Actually HDFC manager wants rs 9000. \
                    Click http://sbi-verify.xyz/login now and share your OTP immediately";
        let verdict = SignalDetector::analyze(text, &[]);
        let messages = vec![
            Message::from_counterparty("This is SBI officer, pay rs 5000 now"),
            Message::from_counterparty(
                "Actually the HDFC manager needs rs 9000, click http://sbi-verify.xyz/login \
                 and share your OTP immediately",
            ),
        ];
        let behavior = BehaviorAnalyzer::analyze(&messages);
        let consistency = ConsistencyChecker::check(&messages);
        let entities = Extractor::extract_all(text);
        let links: Vec<String> = entities.values(EntityType::Link).map(String::from).collect();
        let phishing = PhishingAnalyzer::analyze_links(&links);

        let report = ThreatScorer::score(&verdict, &behavior, &consistency, &entities, &phishing);
        assert!(report.behavior_boost >= 20, "boost was {}", report.behavior_boost);
        assert!(report.final_threat_score > report.base_detection_score);
        assert_eq!(report.threat_classification, "CRITICAL");
        assert!(report
            .risk_factors
            .iter()
            .any(|f| f.contains("Critical phishing URL")));
    }

    #[test]
    fn score_is_capped_at_100() {
        let verdict = SignalDetector::analyze(
            "URGENT share OTP PIN password now, police arrest warrant, pay fee immediately, \
             you won lottery cashback, KYC expired, click link",
            &[],
        );
        let messages = vec![
            Message::from_counterparty("share otp now, police case, pay fee, won lottery"),
            Message::from_counterparty("hurry immediately, arrest warrant, click link, kindly sir"),
        ];
        let behavior = BehaviorAnalyzer::analyze(&messages);
        let consistency = ConsistencyChecker::check(&messages);
        let report = ThreatScorer::score(
            &verdict,
            &behavior,
            &consistency,
            &EntitySet::default(),
            &[],
        );
        assert!(report.final_threat_score <= 100);
    }
}
