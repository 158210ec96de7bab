//! Behavioral fingerprinting of the counterparty.

use crate::domain::conversation::Message;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Manipulation tactics recognized in counterparty messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tactic {
    AuthorityImpersonation,
    ArtificialUrgency,
    FearThreat,
    GreedExploitation,
    SocialEngineering,
    CredentialHarvesting,
    PhishingDelivery,
    DirectMoneyDemand,
    UntraceablePayment,
    EmotionalManipulation,
}

impl Tactic {
    pub fn label(&self) -> &'static str {
        match self {
            Tactic::AuthorityImpersonation => "Authority impersonation",
            Tactic::ArtificialUrgency => "Artificial urgency",
            Tactic::FearThreat => "Fear/threat tactics",
            Tactic::GreedExploitation => "Greed exploitation",
            Tactic::SocialEngineering => "Social engineering",
            Tactic::CredentialHarvesting => "Credential harvesting",
            Tactic::PhishingDelivery => "Malware/phishing delivery",
            Tactic::DirectMoneyDemand => "Direct money demand",
            Tactic::UntraceablePayment => "Untraceable payment demand",
            Tactic::EmotionalManipulation => "Emotional manipulation",
        }
    }

    fn markers(&self) -> &'static [&'static str] {
        match self {
            Tactic::AuthorityImpersonation => {
                &["trust me", "i am from", "official", "authorized", "government"]
            }
            Tactic::ArtificialUrgency => &["immediately", "now", "hurry", "last chance", "expire"],
            Tactic::FearThreat => &["block", "suspend", "arrest", "legal", "court", "fir"],
            Tactic::GreedExploitation => &["won", "prize", "lottery", "cashback", "reward", "crore"],
            Tactic::SocialEngineering => &["dear", "sir", "kindly", "help", "protect", "secure"],
            Tactic::CredentialHarvesting => &["otp", "pin", "password", "cvv", "aadhaar", "pan"],
            Tactic::PhishingDelivery => &["click", "link", "download", "install", "app"],
            Tactic::DirectMoneyDemand => &["transfer", "pay", "send money", "deposit", "fee"],
            Tactic::UntraceablePayment => &["gift card", "bitcoin", "crypto", "western union"],
            Tactic::EmotionalManipulation => &["family", "son", "daughter", "mother", "father"],
        }
    }

    const ALL: [Tactic; 10] = [
        Tactic::AuthorityImpersonation,
        Tactic::ArtificialUrgency,
        Tactic::FearThreat,
        Tactic::GreedExploitation,
        Tactic::SocialEngineering,
        Tactic::CredentialHarvesting,
        Tactic::PhishingDelivery,
        Tactic::DirectMoneyDemand,
        Tactic::UntraceablePayment,
        Tactic::EmotionalManipulation,
    ];
}

/// Overall behavioral classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BehaviorPattern {
    AggressiveEscalator,
    MultiTacticProfessional,
    SmoothOperator,
    Intimidator,
    PatientGroomer,
    RewardBaiter,
    ScriptFollower,
    #[default]
    Unknown,
}

impl BehaviorPattern {
    /// Patterns that by themselves indicate a hardened operator.
    pub fn is_severe(&self) -> bool {
        matches!(
            self,
            BehaviorPattern::AggressiveEscalator | BehaviorPattern::MultiTacticProfessional
        )
    }
}

/// Aggregated behavioral read of one conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorFingerprint {
    /// How sharply urgency language ramped between conversation halves, 0-100.
    pub urgency_escalation: u8,
    /// Aggregate aggression language score, 0-100.
    pub aggression_score: u8,
    pub tactics: BTreeSet<Tactic>,
    pub pattern: BehaviorPattern,
    pub predicted_next_action: String,
    /// 100 minus 25 per story change.
    pub consistency_score: u8,
    pub timeline_pressure: bool,
    pub claimed_organizations: Vec<String>,
    pub story_changes: u8,
    pub messages_analyzed: usize,
}

impl BehaviorFingerprint {
    /// Degenerate result when no counterparty messages exist yet.
    fn empty() -> Self {
        BehaviorFingerprint {
            urgency_escalation: 0,
            aggression_score: 0,
            tactics: BTreeSet::new(),
            pattern: BehaviorPattern::Unknown,
            predicted_next_action: "unknown".to_string(),
            consistency_score: 100,
            timeline_pressure: false,
            claimed_organizations: Vec::new(),
            story_changes: 0,
            messages_analyzed: 0,
        }
    }

    pub fn tactics_count(&self) -> usize {
        self.tactics.len()
    }
}

static URGENCY_WORDS: &[&str] = &[
    "immediately", "urgent", "now", "hurry", "fast", "quick", "turant", "abhi", "jaldi",
    "time limit", "minutes", "seconds", "expire", "last chance", "final", "deadline",
];

static AGGRESSION_WORDS: &[&str] = &[
    "block", "suspend", "arrest", "jail", "police", "court", "fine", "penalty", "legal action",
    "fir", "warrant", "freeze", "terminate", "cancel", "seized", "locked",
];

static ORG_NAMES: &[&str] = &[
    "sbi", "hdfc", "icici", "rbi", "police", "cbi", "ed", "customs", "income tax", "sebi",
];

static BANK_NAMES: &[&str] = &["sbi", "hdfc", "icici", "axis", "pnb", "kotak"];

/// Analyzes how the counterparty communicates rather than what they say.
pub struct BehaviorAnalyzer;

impl BehaviorAnalyzer {
    pub fn analyze(messages: &[Message]) -> BehaviorFingerprint {
        let counterparty: Vec<&Message> =
            messages.iter().filter(|m| m.is_from_counterparty()).collect();
        if counterparty.is_empty() {
            return BehaviorFingerprint::empty();
        }

        let mut urgency_trend = Vec::with_capacity(counterparty.len());
        let mut aggression_trend = Vec::with_capacity(counterparty.len());
        let mut tactics = BTreeSet::new();
        let mut claimed_orgs = BTreeSet::new();

        for msg in &counterparty {
            let text = msg.text().to_lowercase();
            urgency_trend.push(URGENCY_WORDS.iter().filter(|w| text.contains(*w)).count());
            aggression_trend.push(AGGRESSION_WORDS.iter().filter(|w| text.contains(*w)).count());

            for tactic in Tactic::ALL {
                if tactic.markers().iter().any(|m| text.contains(m)) {
                    tactics.insert(tactic);
                }
            }
            for org in ORG_NAMES {
                if text.contains(org) {
                    claimed_orgs.insert(org.to_uppercase());
                }
            }
        }

        let urgency_escalation = Self::escalation(&urgency_trend);
        let aggression_score =
            (aggression_trend.iter().sum::<usize>() * 12).min(100) as u8;

        // Conflicting organization or bank mentions count as story changes.
        let all_text = counterparty
            .iter()
            .map(|m| m.text().to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        let mut story_changes: u8 = 0;
        if claimed_orgs.len() > 1 {
            story_changes += 1;
        }
        let banks_mentioned = BANK_NAMES.iter().filter(|b| all_text.contains(*b)).count();
        if banks_mentioned > 1 {
            story_changes += 1;
        }
        let consistency_score = 100u8.saturating_sub(story_changes * 25);

        let pattern = Self::classify(
            aggression_score,
            urgency_escalation,
            &tactics,
            counterparty.len(),
        );
        let predicted_next_action =
            Self::predict(aggression_score, urgency_escalation, &tactics).to_string();

        let timeline_pressure = counterparty
            .iter()
            .any(|m| {
                let t = m.text().to_lowercase();
                t.contains("minute") || t.contains("second")
            });

        BehaviorFingerprint {
            urgency_escalation,
            aggression_score,
            tactics,
            pattern,
            predicted_next_action,
            consistency_score,
            timeline_pressure,
            claimed_organizations: claimed_orgs.into_iter().collect(),
            story_changes,
            messages_analyzed: counterparty.len(),
        }
    }

    /// Second-half urgency minus first-half urgency, scaled by 25.
    fn escalation(trend: &[usize]) -> u8 {
        if trend.len() < 2 {
            return 0;
        }
        let mid = trend.len() / 2;
        let first: i64 = trend[..mid].iter().sum::<usize>() as i64;
        let second: i64 = trend[mid..].iter().sum::<usize>() as i64;
        ((second - first) * 25).clamp(0, 100) as u8
    }

    fn classify(
        aggression: u8,
        urgency_escalation: u8,
        tactics: &BTreeSet<Tactic>,
        message_count: usize,
    ) -> BehaviorPattern {
        if aggression > 50 && urgency_escalation > 30 {
            BehaviorPattern::AggressiveEscalator
        } else if tactics.len() >= 5 {
            BehaviorPattern::MultiTacticProfessional
        } else if tactics.contains(&Tactic::SocialEngineering) && aggression < 30 {
            BehaviorPattern::SmoothOperator
        } else if aggression > 40 {
            BehaviorPattern::Intimidator
        } else if message_count > 5 && aggression < 20 {
            BehaviorPattern::PatientGroomer
        } else if tactics.contains(&Tactic::GreedExploitation) {
            BehaviorPattern::RewardBaiter
        } else {
            BehaviorPattern::ScriptFollower
        }
    }

    fn predict(
        aggression: u8,
        urgency_escalation: u8,
        tactics: &BTreeSet<Tactic>,
    ) -> &'static str {
        if aggression > 60 {
            "Will escalate threats or disconnect"
        } else if urgency_escalation > 40 {
            "Will create tighter deadline pressure"
        } else if tactics.contains(&Tactic::CredentialHarvesting) {
            "Will demand OTP/PIN/password again"
        } else if tactics.contains(&Tactic::DirectMoneyDemand) {
            "Will push for immediate payment"
        } else if tactics.contains(&Tactic::PhishingDelivery) {
            "Will send another link"
        } else if tactics.contains(&Tactic::GreedExploitation) {
            "Will increase promised reward amount"
        } else {
            "Will repeat scam pitch with variation"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Message;

    fn counterparty(texts: &[&str]) -> Vec<Message> {
        texts.iter().map(|t| Message::from_counterparty(*t)).collect()
    }

    #[test]
    fn no_counterparty_messages_gives_neutral_fingerprint() {
        let msgs = vec![Message::from_agent("hello?")];
        let fp = BehaviorAnalyzer::analyze(&msgs);
        assert_eq!(fp.pattern, BehaviorPattern::Unknown);
        assert_eq!(fp.consistency_score, 100);
        assert_eq!(fp.messages_analyzed, 0);
    }

    #[test]
    fn credential_and_threat_tactics_are_detected() {
        let msgs = counterparty(&[
            "I am from the bank, share your OTP",
            "Your account will be blocked, this is a legal matter",
        ]);
        let fp = BehaviorAnalyzer::analyze(&msgs);
        assert!(fp.tactics.contains(&Tactic::CredentialHarvesting));
        assert!(fp.tactics.contains(&Tactic::FearThreat));
        assert!(fp.tactics.contains(&Tactic::AuthorityImpersonation));
    }

    #[test]
    fn escalating_urgency_with_aggression_is_aggressive_escalator() {
        let msgs = counterparty(&[
            "Hello, I am calling about your account",
            "hurry, police will arrest you, account blocked, court fine, warrant issued now immediately",
        ]);
        let fp = BehaviorAnalyzer::analyze(&msgs);
        assert!(fp.aggression_score > 50);
        assert!(fp.urgency_escalation > 30);
        assert_eq!(fp.pattern, BehaviorPattern::AggressiveEscalator);
        assert!(fp.pattern.is_severe());
    }

    #[test]
    fn polite_pitch_is_smooth_operator() {
        let msgs = counterparty(&[
            "Dear sir, kindly help me verify your details",
            "Sir, this is to protect and secure your savings",
        ]);
        let fp = BehaviorAnalyzer::analyze(&msgs);
        assert_eq!(fp.pattern, BehaviorPattern::SmoothOperator);
    }

    #[test]
    fn conflicting_orgs_reduce_consistency() {
        let msgs = counterparty(&[
            "This is SBI customer care",
            "I told you, I am from HDFC, I mean the RBI department",
        ]);
        let fp = BehaviorAnalyzer::analyze(&msgs);
        assert!(fp.story_changes >= 1);
        assert!(fp.consistency_score < 100);
    }

    #[test]
    fn timeline_pressure_flags_minute_deadlines() {
        let msgs = counterparty(&["You have 10 minutes to comply"]);
        let fp = BehaviorAnalyzer::analyze(&msgs);
        assert!(fp.timeline_pressure);
    }

    #[test]
    fn prediction_prefers_credential_harvesting() {
        let msgs = counterparty(&["Please share your OTP to continue"]);
        let fp = BehaviorAnalyzer::analyze(&msgs);
        assert_eq!(fp.predicted_next_action, "Will demand OTP/PIN/password again");
    }
}
