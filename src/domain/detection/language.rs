//! Language and sophistication heuristics.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Language detected from the counterparty's message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Hinglish,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
    Bengali,
    Unknown,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Hinglish => "Hinglish",
            Language::Tamil => "Tamil",
            Language::Telugu => "Telugu",
            Language::Kannada => "Kannada",
            Language::Malayalam => "Malayalam",
            Language::Bengali => "Bengali",
            Language::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

static DEVANAGARI: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\u{0900}-\u{097F}]").unwrap());
static TAMIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\u{0B80}-\u{0BFF}]").unwrap());
static TELUGU: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\u{0C00}-\u{0C7F}]").unwrap());
static KANNADA: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\u{0C80}-\u{0CFF}]").unwrap());
static MALAYALAM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\u{0D00}-\u{0D7F}]").unwrap());
static BENGALI: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\u{0980}-\u{09FF}]").unwrap());

/// Romanized Hindi tokens used for Hinglish detection.
static HINGLISH_TOKENS: &[&str] = &[
    "kya", "hai", "nahi", "karo", "bhej", "bhai", "yaar", "abhi", "aur", "mera", "tera", "haan",
];

/// Detects the language by Unicode script blocks, falling back to a token
/// heuristic for romanized Hindi.
pub fn detect_language(text: &str) -> Language {
    if DEVANAGARI.is_match(text) {
        return Language::Hindi;
    }
    if TAMIL.is_match(text) {
        return Language::Tamil;
    }
    if TELUGU.is_match(text) {
        return Language::Telugu;
    }
    if KANNADA.is_match(text) {
        return Language::Kannada;
    }
    if MALAYALAM.is_match(text) {
        return Language::Malayalam;
    }
    if BENGALI.is_match(text) {
        return Language::Bengali;
    }
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = lower.split_whitespace().collect();
    let hits = HINGLISH_TOKENS
        .iter()
        .filter(|t| tokens.contains(t))
        .count();
    if hits >= 2 {
        return Language::Hinglish;
    }
    Language::English
}

static REFERENCE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(reference|ticket|complaint)\s*(number|id|no)").unwrap());
static LEGAL_CITATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(section|clause|act)\s*\d").unwrap());
static CASUAL_SLANG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(plz|pls|bro|yaar|bhai)").unwrap());

/// Estimates counterparty sophistication on a 0-100 scale.
///
/// Formal references, legal citations, and long structured messages push the
/// score up; all-caps, exclamation spam, and slang push it down.
pub fn sophistication_score(text: &str, history: &[String]) -> u8 {
    let combined = format!("{} {}", text, history.join(" ")).to_lowercase();
    let mut score: i32 = 50;

    if REFERENCE_NUMBER.is_match(&combined) {
        score += 15;
    }
    if LEGAL_CITATION.is_match(&combined) {
        score += 15;
    }
    if ["compliance", "regulatory", "statutory", "mandate"]
        .iter()
        .any(|w| combined.contains(w))
    {
        score += 10;
    }
    if text.len() > 200 {
        score += 10;
    }

    let has_alpha = text.chars().any(|c| c.is_alphabetic());
    if has_alpha && text.chars().filter(|c| c.is_alphabetic()).all(|c| c.is_uppercase()) {
        score -= 15;
    }
    if text.matches('!').count() > 3 {
        score -= 10;
    }
    if CASUAL_SLANG.is_match(&combined) {
        score -= 15;
    }
    if text.len() < 30 {
        score -= 10;
    }

    score.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_devanagari_as_hindi() {
        assert_eq!(detect_language("आपका खाता ब्लॉक हो जाएगा"), Language::Hindi);
    }

    #[test]
    fn detects_tamil_script() {
        assert_eq!(detect_language("உடனடியாக பணம் அனுப்பவும்"), Language::Tamil);
    }

    #[test]
    fn detects_romanized_hindi_as_hinglish() {
        assert_eq!(
            detect_language("bhai otp bhej do abhi, account band ho jayega"),
            Language::Hinglish
        );
    }

    #[test]
    fn single_hinglish_token_stays_english() {
        assert_eq!(detect_language("what is this yaar"), Language::English);
    }

    #[test]
    fn plain_english_detected() {
        assert_eq!(
            detect_language("Your account will be suspended today"),
            Language::English
        );
    }

    #[test]
    fn formal_text_scores_high() {
        let text = "Dear customer, as per RBI compliance mandate, your reference number \
                    REF-88213 requires statutory verification under Section 12 of the Banking \
                    Regulation Act. Kindly complete the process at the earliest to avoid any \
                    inconvenience to your account services.";
        assert!(sophistication_score(text, &[]) > 65);
    }

    #[test]
    fn shouty_slang_scores_low() {
        assert!(sophistication_score("SEND OTP NOW BRO!!!!", &[]) < 30);
    }

    #[test]
    fn neutral_text_stays_mid() {
        let s = sophistication_score("Please verify your account details today.", &[]);
        assert!((30..=70).contains(&s));
    }
}
