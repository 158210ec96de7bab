//! Cleanup of generated replies before they reach the counterparty.
//!
//! Models wrap replies in quotes, add stage directions, or break character
//! with assistant boilerplate. Anything that would expose the persona as
//! artificial is stripped or rejected outright.

use once_cell::sync::Lazy;
use regex::Regex;

/// Replies shorter than this are useless stubs and get rejected.
pub const MIN_REPLY_CHARS: usize = 6;

static STAGE_DIRECTIONS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"\*[^*]+\*", r"\([^)]+\)", r"\[[^\]]+\]"]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

static AI_DISCLAIMERS: &[&str] = &[
    "as an ai",
    "i'm an ai",
    "i am an artificial",
    "i cannot",
    "language model",
    "i'm sorry, but",
];

static GENERIC_PREFIXES: &[&str] = &["Reply:", "Response:", "Assistant:", "User:"];

pub struct ReplySanitizer;

impl ReplySanitizer {
    /// Cleans a raw model reply. Returns `None` when the reply breaks
    /// character or is too short to send.
    pub fn clean(raw: &str, persona_name: &str) -> Option<String> {
        let mut text = raw.trim().to_string();

        // Strip a fully-quoted reply.
        for (open, close) in [('"', '"'), ('\u{2018}', '\u{2019}'), ('\u{201c}', '\u{201d}')] {
            if text.starts_with(open)
                && text.ends_with(close)
                && text.len() >= open.len_utf8() + close.len_utf8()
            {
                text = text[open.len_utf8()..text.len() - close.len_utf8()].to_string();
            }
        }

        for re in STAGE_DIRECTIONS.iter() {
            text = re.replace_all(&text, "").to_string();
        }

        text = text.trim().to_string();
        let name_prefix = format!("{persona_name}:");
        if let Some(rest) = text.strip_prefix(&name_prefix) {
            text = rest.trim_start().to_string();
        }
        for prefix in GENERIC_PREFIXES {
            if let Some(rest) = text.strip_prefix(prefix) {
                text = rest.trim_start().to_string();
            }
        }

        let lower = text.to_lowercase();
        if AI_DISCLAIMERS.iter().any(|d| lower.contains(d)) {
            return None;
        }

        let text = text.trim().to_string();
        if text.len() < MIN_REPLY_CHARS {
            return None;
        }
        Some(text)
    }
}
