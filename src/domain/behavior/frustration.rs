//! Counterparty frustration scoring.

use crate::domain::conversation::Message;

static DISMISSIVE_WORDS: &[&str] = &["just", "simply", "only", "please just", "bas"];
static INSULT_WORDS: &[&str] = &["idiot", "stupid", "pagal", "bewakoof"];

/// Scores how frustrated the counterparty is getting, 0-100.
///
/// Frustration signals the stalling tactics are working: shouting,
/// clipped repeats, and insults all add up.
pub struct FrustrationTracker;

impl FrustrationTracker {
    pub fn score(messages: &[Message]) -> u8 {
        let counterparty: Vec<&Message> =
            messages.iter().filter(|m| m.is_from_counterparty()).collect();
        if counterparty.len() < 2 {
            return 0;
        }

        let mut score: u32 = 0;
        for (i, msg) in counterparty.iter().enumerate() {
            let text = msg.text();
            let lower = text.to_lowercase();

            let has_alpha = text.chars().any(|c| c.is_alphabetic());
            let all_caps =
                has_alpha && text.chars().filter(|c| c.is_alphabetic()).all(|c| c.is_uppercase());
            if all_caps || text.matches('!').count() > 2 {
                score += 15;
            }
            if text.len() < 20 && i > 1 {
                score += 10;
            }
            if DISMISSIVE_WORDS.iter().any(|w| lower.contains(w)) {
                score += 8;
            }
            let trimmed = lower.trim();
            if counterparty[..i]
                .iter()
                .any(|prev| prev.text().to_lowercase().trim() == trimmed)
            {
                score += 12;
            }
            if INSULT_WORDS.iter().any(|w| lower.contains(w)) {
                score += 20;
            }
        }
        score.min(100) as u8
    }
}
