//! The signal-fusion detector.

use super::language::{detect_language, sophistication_score};
use super::lexicon::{
    self, SignalCategory, ACTION_VERBS, CATEGORY_PATTERNS, CREDENTIAL_WORDS, DEMAND_PHRASES,
    IMPERSONATION_OVERRIDES, INVESTMENT_OVERRIDES, JOB_OVERRIDES, KNOWN_SCAM_PHONES,
    LEGITIMACY_DOMAINS, SAFE_PATTERNS, SUSPICIOUS_SHORT_TLDS,
};
use super::verdict::{DetectionVerdict, RiskBreakdown, ScamCategory, ThreatLevel};
use crate::domain::extraction::Extractor;
use crate::domain::foundation::Timestamp;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// Maximum characters of combined history plus current message analyzed.
const MAX_ANALYSIS_CHARS: usize = 5000;

/// Confidence at or above which a message is flagged as a scam.
const SCAM_THRESHOLD: f64 = 0.35;

static DISCLAIMER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(don'?t|never|do\s*not)\s*(share|tell|disclose)").unwrap());
static FORMAL_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(reference|ref|txn|case)\s*[:#-]?\s*[a-z0-9-]{4,}").unwrap());
static FORMAL_CIRCULAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(circular|guideline|compliance|regulation)\s*(no|number)?").unwrap());
static FORMAL_CITATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(per|as per|under)\s*(rbi|sebi|section|rule|act)").unwrap());

/// Multi-layer scam detector.
///
/// `analyze` fuses the keyword, pattern, combo, demand, legitimacy, and
/// safe-pattern layers in a fixed order. `history` holds prior message texts
/// oldest first, excluding the current message.
pub struct SignalDetector;

impl SignalDetector {
    pub fn analyze(text: &str, history: &[String]) -> DetectionVerdict {
        if text.trim().is_empty() {
            return DetectionVerdict::empty("Empty message");
        }

        let mut full = format!("{} {}", history.join(" "), text);
        if full.chars().count() > MAX_ANALYSIS_CHARS {
            full = full.chars().take(MAX_ANALYSIS_CHARS).collect();
        }

        let norm = lexicon::normalize_leet(&full).to_lowercase();
        let (kw_score, keywords, cats) = Self::keyword_score(&norm);
        let (mut category, pat_score) = Self::pattern_score(&norm);
        let active: BTreeSet<SignalCategory> = cats.keys().copied().collect();
        let combo = lexicon::combo_multiplier(&active);
        let mut demand = Self::has_demand(&norm);
        let legit = Self::legitimacy_deduction(text);
        let safe = Self::matches_safe_pattern(text);
        let phones = Extractor::extract_phones(&full);
        let known = Self::known_scam_phone(&phones);
        let language = detect_language(text);
        let sophistication = sophistication_score(text, history);

        let demand_mult = if demand { 1.0 } else { 0.5 };
        let mut conf = (kw_score * 0.35 + pat_score * 0.45) * combo * demand_mult;
        if keywords.len() > 5 {
            conf = (conf + 0.10).min(1.0);
        }
        if keywords.len() > 10 {
            conf = (conf + 0.10).min(1.0);
        }
        if known {
            conf = (conf + 0.30).min(1.0);
        }

        // Keyword-driven category overrides. Authority keywords beat whatever
        // the pattern layer picked.
        let count_in = |set: &[&str]| {
            keywords
                .iter()
                .filter(|k| set.contains(&k.to_lowercase().as_str()))
                .count()
        };
        let imp_count = count_in(IMPERSONATION_OVERRIDES);
        if imp_count >= 2 && cats.contains_key(&SignalCategory::Impersonation) {
            category = ScamCategory::Impersonation;
        } else if imp_count >= 1
            && cats.contains_key(&SignalCategory::Threat)
            && cats.contains_key(&SignalCategory::MoneyRequest)
        {
            category = ScamCategory::Impersonation;
        }
        if count_in(INVESTMENT_OVERRIDES) >= 2 {
            category = ScamCategory::InvestmentFraud;
        }
        if count_in(JOB_OVERRIDES) >= 2 {
            category = ScamCategory::JobScam;
        }

        // Formal scams sound legitimate but combine politeness with demands.
        let formal_signals = Self::formal_signals(text);
        let has_cred_or_money = cats.contains_key(&SignalCategory::CredentialRequest)
            || cats.contains_key(&SignalCategory::MoneyRequest);
        if formal_signals >= 2 && has_cred_or_money {
            conf = conf.max(0.55);
        }
        if formal_signals >= 1 && demand {
            conf = conf.max(0.45);
        }

        // Several triggered categories at once is near-certain.
        if active.len() >= 4 {
            conf = conf.max(0.65);
        } else if active.len() >= 3 {
            conf = conf.max(0.50);
        }

        // Concrete artifacts plus a demand raise the floor.
        let links = Extractor::extract_links(text);
        if !phones.is_empty() && demand {
            conf = conf.max(0.50);
        }
        if !links.is_empty() && demand {
            conf = conf.max(0.55);
        }
        if !Extractor::extract_payment_handles(text).is_empty() && demand {
            conf = conf.max(0.55);
        }

        // "Send OTP" style messages are short but unambiguous.
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower.split_whitespace().collect();
        if words.len() <= 5 {
            let has_cred = words.iter().any(|w| CREDENTIAL_WORDS.contains(w));
            let has_verb = words.iter().any(|w| ACTION_VERBS.contains(w));
            if has_cred && has_verb {
                conf = conf.max(0.55);
                demand = true;
            }
        }

        // A bare suspicious link with no surrounding text is phishing.
        if !links.is_empty() && words.len() <= 5 {
            let suspicious = links.iter().any(|link| {
                let l = link.to_lowercase();
                SUSPICIOUS_SHORT_TLDS.iter().any(|tld| l.contains(tld))
            });
            if suspicious {
                conf = (conf + 0.40).min(1.0);
                if category == ScamCategory::Unknown {
                    category = ScamCategory::Phishing;
                }
            }
        }

        // "ok" / "yes" continues a scam the history already established.
        if words.len() <= 3 && !history.is_empty() {
            let hist_norm = history.join(" ").to_lowercase();
            let (hist_kw, _, _) = Self::keyword_score(&hist_norm);
            if hist_kw > 0.2 {
                conf = conf.max(0.40);
            }
        }

        conf = (conf - legit).max(0.0);
        if safe {
            conf = conf.min(0.15);
        }
        conf = (conf.clamp(0.0, 1.0) * 100.0).round() / 100.0;

        let explanation = Self::explain(&cats, demand, known, pat_score, category, &keywords, safe, conf);
        let severity = (conf * 70.0
            + if demand { 30.0 } else { 0.0 }
            + if known { 20.0 } else { 0.0 })
        .min(100.0) as u8;

        let mut detected_keywords = keywords;
        detected_keywords.truncate(20);

        DetectionVerdict {
            scam_detected: conf >= SCAM_THRESHOLD,
            category,
            confidence: conf,
            threat_level: ThreatLevel::from_confidence(conf),
            detected_keywords,
            detected_language: language,
            known_scammer: known,
            explanation,
            predicted_next_moves: lexicon::predicted_moves(category)
                .iter()
                .map(|m| m.to_string())
                .collect(),
            demand_detected: demand,
            legitimacy_deduction: (legit * 100.0).round() / 100.0,
            severity,
            safe_pattern: safe,
            sophistication,
            breakdown: RiskBreakdown {
                keyword_score: (kw_score * 1000.0).round() / 10.0,
                pattern_score: (pat_score * 1000.0).round() / 10.0,
                combo_multiplier: combo,
                demand_multiplier: demand_mult,
                legitimacy_deduction: (legit * 1000.0).round() / 10.0,
                total_score: (conf * 1000.0).round() / 10.0,
            },
            triggered_categories: cats.iter().map(|(k, v)| (*k, v.len())).collect(),
            analyzed_at: Timestamp::now(),
        }
    }

    /// Weighted keyword layer. Returns the capped score, every matched
    /// keyword, and the per-category hit lists.
    fn keyword_score(
        lower: &str,
    ) -> (f64, Vec<String>, BTreeMap<SignalCategory, Vec<&'static str>>) {
        let mut score = 0.0;
        let mut found = Vec::new();
        let mut cats = BTreeMap::new();
        for cat in SignalCategory::ALL {
            let mut hits = Vec::new();
            for kw in cat.keywords() {
                if lower.contains(kw) {
                    score += cat.weight();
                    found.push(kw.to_string());
                    hits.push(*kw);
                }
            }
            if !hits.is_empty() {
                cats.insert(cat, hits);
            }
        }
        (score.min(1.0), found, cats)
    }

    /// Regex pattern layer. Each matching pattern adds 0.25; the highest
    /// scoring category wins, earlier categories winning ties.
    fn pattern_score(lower: &str) -> (ScamCategory, f64) {
        let mut best_cat = ScamCategory::Unknown;
        let mut best = 0.0;
        for (cat, patterns) in CATEGORY_PATTERNS.iter() {
            let hits = patterns.iter().filter(|p| p.is_match(lower)).count();
            let score = (hits as f64 * 0.25).min(1.0);
            if score > best {
                best = score;
                best_cat = *cat;
            }
        }
        (best_cat, best)
    }

    fn has_demand(lower: &str) -> bool {
        DEMAND_PHRASES.iter().any(|d| lower.contains(d))
    }

    /// Deduction for legitimacy markers in the raw current message only.
    fn legitimacy_deduction(text: &str) -> f64 {
        let lower = text.to_lowercase();
        let mut deduction: f64 = 0.0;
        for domain in LEGITIMACY_DOMAINS {
            if lower.contains(domain) {
                deduction += 0.12;
            }
        }
        if DISCLAIMER.is_match(&lower) {
            deduction += 0.25;
        }
        let urgency_head = &SignalCategory::Urgency.keywords()[..15];
        if !urgency_head.iter().any(|kw| lower.contains(kw)) {
            deduction += 0.05;
        }
        deduction.min(0.50)
    }

    fn matches_safe_pattern(text: &str) -> bool {
        SAFE_PATTERNS.iter().any(|p| p.is_match(text))
    }

    fn known_scam_phone(phones: &[String]) -> bool {
        phones.iter().any(|p| {
            let digits: String = p.chars().filter(|c| c.is_ascii_digit()).collect();
            let tail = if digits.len() > 10 {
                &digits[digits.len() - 10..]
            } else {
                digits.as_str()
            };
            KNOWN_SCAM_PHONES.contains(tail)
        })
    }

    fn formal_signals(text: &str) -> usize {
        let lower = text.to_lowercase();
        let mut signals = 0;
        if lower.contains("dear customer") || lower.contains("dear sir") || lower.contains("dear user")
        {
            signals += 1;
        }
        if FORMAL_REFERENCE.is_match(&lower) {
            signals += 1;
        }
        if FORMAL_CIRCULAR.is_match(&lower) {
            signals += 1;
        }
        if FORMAL_CITATION.is_match(&lower) {
            signals += 1;
        }
        if lower.contains("compliance desk") || lower.contains("verification required") {
            signals += 1;
        }
        signals
    }

    #[allow(clippy::too_many_arguments)]
    fn explain(
        cats: &BTreeMap<SignalCategory, Vec<&'static str>>,
        demand: bool,
        known: bool,
        pat_score: f64,
        category: ScamCategory,
        keywords: &[String],
        safe: bool,
        conf: f64,
    ) -> String {
        let mut parts = Vec::new();
        if cats.len() >= 3 {
            let names: Vec<&str> = SignalCategory::ALL
                .iter()
                .filter(|c| cats.contains_key(c))
                .take(4)
                .map(|c| c.label())
                .collect();
            parts.push(format!("Multiple indicators: {}", names.join(", ")));
        }
        if demand {
            parts.push("Demands user action".to_string());
        }
        if known {
            parts.push("Known scammer number".to_string());
        }
        if pat_score > 0.0 {
            parts.push(format!("Matches {} pattern", category.label()));
        }
        if keywords.len() > 5 {
            parts.push(format!("{} scam keywords", keywords.len()));
        }
        if safe {
            parts.push("Matches safe pattern - likely legitimate".to_string());
        }
        if parts.is_empty() {
            parts.push(
                if conf < SCAM_THRESHOLD {
                    "Low indicators"
                } else {
                    "Moderate indicators"
                }
                .to_string(),
            );
        }
        parts.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(text: &str) -> DetectionVerdict {
        SignalDetector::analyze(text, &[])
    }

    #[test]
    fn empty_message_yields_zero_verdict() {
        let v = analyze("   ");
        assert!(!v.scam_detected);
        assert_eq!(v.confidence, 0.0);
        assert_eq!(v.explanation, "Empty message");
    }

    #[test]
    fn banking_threat_with_otp_demand_is_flagged() {
        let v = analyze(
            "Dear customer, your SBI account will be blocked today. \
             Share your OTP immediately to verify.",
        );
        assert!(v.scam_detected);
        assert!(v.confidence >= 0.5, "confidence was {}", v.confidence);
        assert_eq!(v.category, ScamCategory::BankingFraud);
        assert!(v.demand_detected);
        assert!(v.threat_level >= ThreatLevel::Medium);
    }

    #[test]
    fn genuine_otp_notification_is_capped_by_safe_pattern() {
        let v = analyze("Your OTP is 482910. Do not share it with anyone.");
        assert!(v.safe_pattern);
        assert!(v.confidence <= 0.15);
        assert!(!v.scam_detected);
    }

    #[test]
    fn short_otp_demand_is_flagged() {
        let v = analyze("Send OTP now");
        assert!(v.scam_detected);
        assert!(v.confidence >= 0.5);
        assert!(v.demand_detected);
    }

    #[test]
    fn leetspeak_does_not_evade_detection() {
        let v = analyze("Y0ur acc0unt is bl0cked! Send 0TP n0w to verify or face legal action");
        assert!(v.scam_detected);
    }

    #[test]
    fn known_scam_phone_boosts_confidence() {
        let v = analyze("Call 9876543210 immediately and pay rs 500 processing fee");
        assert!(v.known_scammer);
        assert!(v.confidence >= 0.5);
    }

    #[test]
    fn suspicious_bare_link_is_phishing() {
        let v = analyze("http://claim-prize.xyz/win");
        assert!(v.confidence >= 0.35, "confidence was {}", v.confidence);
        assert_eq!(v.category, ScamCategory::Phishing);
    }

    #[test]
    fn short_reply_inherits_scam_context_from_history() {
        let history = vec![
            "Your account will be blocked today. Verify your OTP and PIN immediately or face \
             legal action from the cyber cell."
                .to_string(),
        ];
        let v = SignalDetector::analyze("ok", &history);
        assert!(v.confidence >= 0.40, "confidence was {}", v.confidence);
    }

    #[test]
    fn impersonation_keywords_override_category() {
        let v = analyze(
            "This is inspector Sharma from CBI cyber cell. There is a warrant against you. \
             Pay the fine now or face arrest.",
        );
        assert!(v.scam_detected);
        assert_eq!(v.category, ScamCategory::Impersonation);
    }

    #[test]
    fn investment_pitch_gets_investment_category() {
        let v = analyze(
            "Invest in crypto trading today, guaranteed returns with daily profit. \
             Double money in one week, send advance now.",
        );
        assert!(v.scam_detected);
        assert_eq!(v.category, ScamCategory::InvestmentFraud);
    }

    #[test]
    fn plain_greeting_is_not_flagged() {
        let v = analyze("Hi, are we still meeting for lunch tomorrow?");
        assert!(!v.scam_detected);
    }

    #[test]
    fn confidence_is_rounded_and_bounded() {
        let v = analyze(
            "URGENT: account blocked, suspended, frozen! Share OTP, PIN, password, CVV now. \
             Pay fee immediately. You won a lottery prize, claim cashback. KYC expired.",
        );
        assert!((0.0..=1.0).contains(&v.confidence));
        let scaled = v.confidence * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-9);
    }
}
