//! Story consistency checking across counterparty messages.

use crate::domain::conversation::Message;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Result of the consistency check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyReport {
    pub inconsistencies: Vec<String>,
    /// 100 minus 20 per inconsistency, floored at 0.
    pub consistency_score: u8,
    pub story_changes: usize,
}

impl ConsistencyReport {
    fn clean() -> Self {
        ConsistencyReport {
            inconsistencies: Vec::new(),
            consistency_score: 100,
            story_changes: 0,
        }
    }
}

static BANK_NAMES: &[(&str, &str)] = &[
    ("sbi", "SBI"),
    ("hdfc", "HDFC"),
    ("icici", "ICICI"),
    ("axis", "Axis"),
    ("pnb", "PNB"),
    ("kotak", "Kotak"),
    ("bob", "BOB"),
    ("canara", "Canara"),
    ("yes bank", "Yes Bank"),
];

static ORG_NAMES: &[(&str, &str)] = &[
    ("police", "Police"),
    ("cbi", "CBI"),
    ("ed", "ED"),
    ("rbi", "RBI"),
    ("sebi", "SEBI"),
    ("income tax", "Income Tax"),
    ("customs", "Customs"),
];

static AMOUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:rs\.?|₹|inr)\s*[\d,]+").unwrap());
static ACCOUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{10,18}\b").unwrap());
static DESIGNATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(officer|manager|inspector|director|executive|advisor)\b").unwrap());

/// Detects when the counterparty's story shifts mid-conversation.
pub struct ConsistencyChecker;

impl ConsistencyChecker {
    pub fn check(messages: &[Message]) -> ConsistencyReport {
        let texts: Vec<String> = messages
            .iter()
            .filter(|m| m.is_from_counterparty())
            .map(|m| m.text().to_string())
            .collect();
        if texts.len() < 2 {
            return ConsistencyReport::clean();
        }

        let all_lower = texts.join(" ").to_lowercase();
        let mut inconsistencies = Vec::new();

        let banks = Self::named_mentions(&texts, BANK_NAMES);
        if banks.len() > 1 {
            inconsistencies.push(format!(
                "Changed bank name: mentioned {}",
                banks.into_iter().collect::<Vec<_>>().join(", ")
            ));
        }

        let orgs = Self::named_mentions(&texts, ORG_NAMES);
        if orgs.len() > 1 {
            inconsistencies.push(format!(
                "Changed organization: mentioned {}",
                orgs.into_iter().collect::<Vec<_>>().join(", ")
            ));
        }

        let amounts: BTreeSet<&str> =
            AMOUNT.find_iter(&all_lower).map(|m| m.as_str()).collect();
        if amounts.len() > 1 {
            inconsistencies.push(format!(
                "Changed amount: mentioned {}",
                amounts.into_iter().take(3).collect::<Vec<_>>().join(", ")
            ));
        }

        let accounts: BTreeSet<&str> =
            ACCOUNT.find_iter(&all_lower).map(|m| m.as_str()).collect();
        if accounts.len() > 1 {
            inconsistencies.push("Referenced different account numbers".to_string());
        }

        let designations: BTreeSet<&str> =
            DESIGNATION.find_iter(&all_lower).map(|m| m.as_str()).collect();
        if designations.len() > 1 {
            inconsistencies.push(format!(
                "Changed designation: used {}",
                designations.into_iter().collect::<Vec<_>>().join(", ")
            ));
        }

        let story_changes = inconsistencies.len();
        ConsistencyReport {
            inconsistencies,
            consistency_score: 100u8.saturating_sub((story_changes as u8).saturating_mul(20)),
            story_changes,
        }
    }

    fn named_mentions(texts: &[String], table: &[(&str, &'static str)]) -> BTreeSet<&'static str> {
        let mut found = BTreeSet::new();
        for text in texts {
            let lower = text.to_lowercase();
            for (needle, canonical) in table {
                if lower.contains(needle) {
                    found.insert(*canonical);
                }
            }
        }
        found
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
    fn single_message_is_trivially_consistent() {
        let report = ConsistencyChecker::check(&counterparty(&["I am from SBI"]));
        assert_eq!(report.consistency_score, 100);
        assert!(report.inconsistencies.is_empty());
    }

    #[test]
    fn bank_switch_is_an_inconsistency() {
        let report = ConsistencyChecker::check(&counterparty(&[
            "Your SBI account is blocked",
            "Our HDFC branch will call you",
        ]));
        assert_eq!(report.story_changes, 1);
        assert_eq!(report.consistency_score, 80);
        assert!(report.inconsistencies[0].contains("bank name"));
    }

    #[test]
    fn amount_and_designation_changes_stack() {
        let report = ConsistencyChecker::check(&counterparty(&[
            "Officer speaking, pay rs 5000 fine",
            "The manager says the penalty is rs 9000 now",
        ]));
        assert!(report.story_changes >= 2);
        assert!(report.consistency_score <= 60);
    }

    #[test]
    fn score_floors_at_zero() {
        let report = ConsistencyChecker::check(&counterparty(&[
            "SBI officer here, pay rs 1000 to account 12345678901",
            "HDFC manager here, rs 2000 to 98765432109, police CBI case",
            "Actually the RBI inspector wants inr 3000 in account 11112222333",
        ]));
        assert_eq!(report.story_changes, 5);
        assert_eq!(report.consistency_score, 0);
    }
}
