//! Semantic deduplication of outgoing replies.
//!
//! A victim who asks "OTP kya hai?" three times in a row reads as a bot.
//! Two replies count as duplicates when they match exactly, fall into the
//! same semantic group, or share most of their tokens.

use std::collections::BTreeSet;

/// Token overlap above this ratio marks two replies as the same thought.
const OVERLAP_THRESHOLD: f64 = 0.7;

/// Replies in the same group express the same idea even with different
/// wording, so only one of them may be used per conversation.
static SEMANTIC_GROUPS: &[&[&str]] = &[
    &["otp kya hai", "what is otp", "otp matlab", "what otp", "which otp"],
    &["my son handles", "son will help", "ask my son", "son knows computer"],
    &["i don't understand", "samajh nahi", "not understanding", "confused"],
    &["which bank", "what bank", "kaunsa bank", "bank name"],
    &["who are you", "kaun ho", "your name", "who is this", "who calling"],
    &["wait a moment", "ek minute", "ruko", "hold on", "one minute"],
    &["my phone is slow", "phone slow", "phone hang", "phone problem"],
    &["let me check", "checking", "dekh raha", "dekhta hoon"],
    &["i am scared", "dar lag raha", "worried", "tension ho raha"],
    &["tell me more", "aur batao", "explain", "what happened exactly"],
];

pub struct ResponseDeduplicator;

impl ResponseDeduplicator {
    /// True when `candidate` repeats any previous reply in meaning.
    pub fn is_repeat(candidate: &str, previous: &[String]) -> bool {
        previous.iter().any(|p| Self::is_similar(candidate, p))
    }

    pub fn is_similar(a: &str, b: &str) -> bool {
        let a_lower = a.to_lowercase();
        let b_lower = b.to_lowercase();
        if a_lower.trim() == b_lower.trim() {
            return true;
        }

        for group in SEMANTIC_GROUPS {
            let a_in = group.iter().any(|phrase| a_lower.contains(phrase));
            let b_in = group.iter().any(|phrase| b_lower.contains(phrase));
            if a_in && b_in {
                return true;
            }
        }

        let a_tokens: BTreeSet<&str> = a_lower.split_whitespace().collect();
        let b_tokens: BTreeSet<&str> = b_lower.split_whitespace().collect();
        if a_tokens.is_empty() || b_tokens.is_empty() {
            return false;
        }
        let overlap = a_tokens.intersection(&b_tokens).count() as f64;
        let larger = a_tokens.len().max(b_tokens.len()) as f64;
        overlap / larger > OVERLAP_THRESHOLD
    }
}
