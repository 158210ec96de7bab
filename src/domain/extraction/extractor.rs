//! Regex-driven entity extractor.

use super::entity::{EntitySet, EntityType};
use crate::domain::detection::lexicon::SignalCategory;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Maximum characters of input scanned by `extract_all`.
const MAX_EXTRACTION_CHARS: usize = 20_000;

/// Keyword cap so a single message cannot flood the keyword set.
const MAX_KEYWORDS: usize = 20;

// Indian mobile numbers are ten digits starting 6-9. Word boundaries stand in
// for digit lookarounds: a digit run longer than ten has no internal boundary,
// so runs of the wrong length never match.
static PHONE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\+91[-\s]?[6-9]\d{9}",
        r"\b[6-9]\d{9}\b",
        r"\+91[-\s]?\d{5}[-\s]?\d{5}",
        r"\b1800[-\s]?\d{3}[-\s]?\d{4}\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("phone regex"))
    .collect()
});

static UPI_HANDLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z0-9._-]+@[a-zA-Z]+").unwrap());

static UPI_SUFFIXES: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    [
        "upi", "ybl", "paytm", "okaxis", "okhdfcbank", "oksbi", "okicici", "apl", "axisbank",
        "ibl", "sbi", "hdfcbank", "icici", "kotak", "indus", "pnb", "boi", "canara", "bob",
        "freecharge", "mobikwik", "jio", "airtel",
    ]
    .into_iter()
    .collect()
});

static ACCOUNT_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{9,18}\b").unwrap());
static IFSC_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z]{4}0[A-Z0-9]{6}\b").unwrap());
static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s<>"{}|\\^`\[\]]+"#).unwrap());
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());
static AADHAAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{4}[-\s]?\d{4}[-\s]?\d{4}\b").unwrap());
static PAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z]{5}\d{4}[A-Z]\b").unwrap());
static BTC_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[13][a-km-zA-HJ-NP-Z1-9]{25,34}\b").unwrap());
static ETH_ADDRESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b0x[a-fA-F0-9]{40}\b").unwrap());
static REMOTE_TOOLS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(anydesk|teamviewer|quicksupport|rustdesk|ammyy|ultraviewer|telegram|whatsapp|signal)\b",
    )
    .unwrap()
});
static DESIGNATIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(officer|manager|inspector|constable|superintendent|director|executive|advisor|consultant|agent|representative)\b",
    )
    .unwrap()
});
static ORGANIZATIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(RBI|SEBI|TRAI|CBI|ED|Income Tax|Customs|NPCI|SBI|HDFC|ICICI|Axis|Kotak|PNB|BOI|Canara|Federal|Yes Bank|IndusInd|Paytm|PhonePe|Google Pay|Razorpay|Airtel|Jio|BSNL|Vodafone)\b",
    )
    .unwrap()
});

/// Stateless entity extractor.
pub struct Extractor;

impl Extractor {
    /// Extracts phone numbers, normalized to bare digit strings with an
    /// optional `+91` prefix retained.
    pub fn extract_phones(text: &str) -> Vec<String> {
        let mut out = BTreeSet::new();
        for pattern in PHONE_PATTERNS.iter() {
            for m in pattern.find_iter(text) {
                let normalized: String = m
                    .as_str()
                    .chars()
                    .filter(|c| !c.is_whitespace() && *c != '-')
                    .collect();
                out.insert(normalized);
            }
        }
        out.into_iter().collect()
    }

    /// Extracts UPI-style payment handles, keeping only known PSP suffixes so
    /// email addresses are not misread as handles.
    pub fn extract_payment_handles(text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let mut out = BTreeSet::new();
        for m in UPI_HANDLE.find_iter(&lower) {
            let handle = m.as_str();
            if let Some(suffix) = handle.rsplit('@').next() {
                if UPI_SUFFIXES.contains(suffix) {
                    out.insert(handle.to_string());
                }
            }
        }
        out.into_iter().collect()
    }

    /// Extracts 9-18 digit account numbers, skipping runs that look like
    /// phone numbers with country prefixes.
    pub fn extract_accounts(text: &str) -> Vec<String> {
        let mut out = BTreeSet::new();
        for m in ACCOUNT_NUMBER.find_iter(text) {
            let digits = m.as_str();
            if !digits.starts_with("91") && !digits.starts_with("17") && !digits.starts_with("19")
            {
                out.insert(digits.to_string());
            }
        }
        out.into_iter().collect()
    }

    pub fn extract_routing_codes(text: &str) -> Vec<String> {
        let upper = text.to_uppercase();
        IFSC_CODE
            .find_iter(&upper)
            .map(|m| m.as_str().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn extract_links(text: &str) -> Vec<String> {
        URL.find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Extracts email addresses, excluding UPI handles whose suffix happens
    /// to contain a dot.
    pub fn extract_emails(text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let mut out = BTreeSet::new();
        for m in EMAIL.find_iter(&lower) {
            let email = m.as_str();
            if let Some(domain) = email.rsplit('@').next() {
                if !UPI_SUFFIXES.contains(domain) && domain.contains('.') {
                    out.insert(email.to_string());
                }
            }
        }
        out.into_iter().collect()
    }

    /// Extracts 12-digit national identity numbers written as 4-4-4 groups.
    pub fn extract_national_ids(text: &str) -> Vec<String> {
        let mut out = BTreeSet::new();
        for m in AADHAAR.find_iter(text) {
            let digits: String = m.as_str().chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.len() == 12 {
                out.insert(digits);
            }
        }
        out.into_iter().collect()
    }

    pub fn extract_tax_ids(text: &str) -> Vec<String> {
        let upper = text.to_uppercase();
        PAN.find_iter(&upper)
            .map(|m| m.as_str().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn extract_crypto_addresses(text: &str) -> Vec<String> {
        let mut out = BTreeSet::new();
        for m in BTC_ADDRESS.find_iter(text) {
            out.insert(m.as_str().to_string());
        }
        for m in ETH_ADDRESS.find_iter(text) {
            out.insert(m.as_str().to_string());
        }
        out.into_iter().collect()
    }

    /// Remote-access and messaging tools the counterparty mentions.
    pub fn extract_tool_mentions(text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        REMOTE_TOOLS
            .find_iter(&lower)
            .map(|m| m.as_str().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Job titles the counterparty claims for themselves.
    pub fn extract_claimed_roles(text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        DESIGNATIONS
            .find_iter(&lower)
            .map(|m| m.as_str().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Organizations the counterparty claims to represent, canonicalized to
    /// uppercase so casing differences deduplicate.
    pub fn extract_claimed_orgs(text: &str) -> Vec<String> {
        ORGANIZATIONS
            .find_iter(text)
            .map(|m| m.as_str().to_uppercase())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Scam lexicon keywords present in the text, capped at 20.
    pub fn extract_keywords(text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let mut out = BTreeSet::new();
        for cat in SignalCategory::ALL {
            for kw in cat.keywords() {
                if lower.contains(kw) {
                    out.insert(kw.to_string());
                }
            }
        }
        out.into_iter().take(MAX_KEYWORDS).collect()
    }

    /// Runs every extractor over the text and collects the results.
    pub fn extract_all(text: &str) -> EntitySet {
        let truncated: String;
        let text = if text.chars().count() > MAX_EXTRACTION_CHARS {
            truncated = text.chars().take(MAX_EXTRACTION_CHARS).collect();
            truncated.as_str()
        } else {
            text
        };

        let mut set = EntitySet::new();
        set.insert_all(EntityType::Phone, Self::extract_phones(text));
        set.insert_all(EntityType::PaymentHandle, Self::extract_payment_handles(text));
        set.insert_all(EntityType::BankAccount, Self::extract_accounts(text));
        set.insert_all(EntityType::RoutingCode, Self::extract_routing_codes(text));
        set.insert_all(EntityType::Link, Self::extract_links(text));
        set.insert_all(EntityType::Email, Self::extract_emails(text));
        set.insert_all(EntityType::NationalId, Self::extract_national_ids(text));
        set.insert_all(EntityType::TaxId, Self::extract_tax_ids(text));
        set.insert_all(EntityType::CryptoAddress, Self::extract_crypto_addresses(text));
        set.insert_all(EntityType::ToolMention, Self::extract_tool_mentions(text));
        set.insert_all(EntityType::ClaimedRole, Self::extract_claimed_roles(text));
        set.insert_all(EntityType::ClaimedOrg, Self::extract_claimed_orgs(text));
        set.insert_all(EntityType::Keyword, Self::extract_keywords(text));
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_mobile_number_with_and_without_prefix() {
        let phones = Extractor::extract_phones("Call me at +91 98765 43210 or 8888777766");
        assert!(phones.contains(&"+919876543210".to_string()));
        assert!(phones.contains(&"8888777766".to_string()));
    }

    #[test]
    fn ignores_overlong_digit_runs() {
        let phones = Extractor::extract_phones("ref 98765432101234");
        assert!(phones.is_empty());
    }

    #[test]
    fn extracts_tollfree_number() {
        let phones = Extractor::extract_phones("helpline 1800-123-4567");
        assert!(phones.contains(&"18001234567".to_string()));
    }

    #[test]
    fn upi_handle_requires_known_suffix() {
        let handles = Extractor::extract_payment_handles("pay to scammer@ybl not me@gmail");
        assert_eq!(handles, vec!["scammer@ybl".to_string()]);
    }

    #[test]
    fn account_numbers_skip_phone_prefixes() {
        let accounts = Extractor::extract_accounts("a/c 1234567890123456 from 917700112233");
        assert_eq!(accounts, vec!["1234567890123456".to_string()]);
    }

    #[test]
    fn extracts_routing_code_case_insensitively() {
        let codes = Extractor::extract_routing_codes("transfer via sbin0001234 today");
        assert_eq!(codes, vec!["SBIN0001234".to_string()]);
    }

    #[test]
    fn email_excludes_payment_handles() {
        let text = "write to fraud.desk@fake-bank.com or pay victim@paytm";
        let emails = Extractor::extract_emails(text);
        assert_eq!(emails, vec!["fraud.desk@fake-bank.com".to_string()]);
        assert_eq!(
            Extractor::extract_payment_handles(text),
            vec!["victim@paytm".to_string()]
        );
    }

    #[test]
    fn national_id_normalizes_separators() {
        let ids = Extractor::extract_national_ids("aadhaar 1234 5678 9012 please");
        assert_eq!(ids, vec!["123456789012".to_string()]);
    }

    #[test]
    fn extracts_tax_id_uppercased() {
        let ids = Extractor::extract_tax_ids("pan abcde1234f");
        assert_eq!(ids, vec!["ABCDE1234F".to_string()]);
    }

    #[test]
    fn extracts_eth_address() {
        let addr = "0x52908400098527886E0F7030069857D2E4169EE7";
        let found = Extractor::extract_crypto_addresses(&format!("send to {addr}"));
        assert_eq!(found, vec![addr.to_string()]);
    }

    #[test]
    fn extracts_remote_tools_and_orgs() {
        let text = "Install AnyDesk now, this is RBI customer care";
        assert_eq!(
            Extractor::extract_tool_mentions(text),
            vec!["anydesk".to_string()]
        );
        assert!(Extractor::extract_claimed_orgs(text).contains(&"RBI".to_string()));
    }

    #[test]
    fn extract_all_populates_multiple_types() {
        let set = Extractor::extract_all(
            "This is officer Verma from SBI. Pay to fraud@ybl or call 9876543210. \
             Click http://verify-sbi.xyz/login now",
        );
        assert_eq!(set.count(EntityType::Phone), 1);
        assert_eq!(set.count(EntityType::PaymentHandle), 1);
        assert_eq!(set.count(EntityType::Link), 1);
        assert_eq!(set.count(EntityType::ClaimedRole), 1);
        assert!(set.count(EntityType::ClaimedOrg) >= 1);
        assert!(set.count(EntityType::Keyword) >= 1);
    }

    #[test]
    fn extract_all_handles_oversized_input() {
        let big = "a".repeat(50_000) + " call 9876543210";
        // Number sits past the truncation point and is dropped.
        let set = Extractor::extract_all(&big);
        assert_eq!(set.count(EntityType::Phone), 0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_valid_mobile_number_is_found(n in 6_000_000_000u64..=9_999_999_999u64) {
                let phones = Extractor::extract_phones(&format!("call {n} now"));
                prop_assert!(phones.contains(&n.to_string()));
            }

            #[test]
            fn extracted_phones_carry_no_separators(text in "[0-9+\\- ]{0,40}") {
                for phone in Extractor::extract_phones(&text) {
                    prop_assert!(!phone.contains(' '));
                    prop_assert!(!phone.contains('-'));
                }
            }

            #[test]
            fn extract_all_tolerates_arbitrary_text(text in "\\PC{0,200}") {
                let set = Extractor::extract_all(&text);
                prop_assert!(set.count(EntityType::Keyword) <= MAX_KEYWORDS);
            }
        }
    }
}
