//! Deep phishing analysis of extracted links.

use crate::domain::detection::lexicon::normalize_leet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Risk bucket for a single link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkRisk {
    Low,
    Medium,
    High,
    Critical,
    Unknown,
}

impl LinkRisk {
    fn from_score(score: u8) -> Self {
        if score >= 60 {
            LinkRisk::Critical
        } else if score >= 40 {
            LinkRisk::High
        } else if score >= 20 {
            LinkRisk::Medium
        } else {
            LinkRisk::Low
        }
    }
}

/// Analysis result for one link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAnalysis {
    pub url: String,
    pub domain: Option<String>,
    pub risk: LinkRisk,
    /// Risk score, 0-100.
    pub risk_score: u8,
    pub reasons: Vec<String>,
}

static TRUSTED_BRANDS: &[&str] = &[
    "paytm", "phonepe", "googlepay", "sbi", "hdfc", "icici", "axis", "kotak", "amazon",
    "flipkart", "razorpay", "bharatpe", "rbi", "npci", "uidai", "whatsapp", "telegram",
    "facebook", "instagram", "microsoft", "apple", "google",
];

/// TLDs favored by throwaway phishing domains.
pub static SUSPICIOUS_TLDS: &[&str] = &[
    ".xyz", ".ml", ".tk", ".ga", ".cf", ".gq", ".top", ".club", ".info", ".buzz", ".wang",
    ".icu", ".cam", ".rest", ".monster", ".click", ".link", ".support", ".online", ".site",
    ".fun", ".space", ".tech", ".store", ".live",
];

static SAFE_DOMAINS: &[&str] = &[
    "google.com", "microsoft.com", "apple.com", "amazon.in", "flipkart.com", "paytm.com",
    "sbi.co.in", "hdfcbank.com", "icicibank.com", "rbi.org.in", "npci.org.in", "uidai.gov.in",
    "gov.in", "nic.in",
];

static SUSPICIOUS_PATH_WORDS: &[&str] = &[
    "login", "verify", "update", "secure", "account", "confirm", "kyc", "otp", "bank", "suspend",
];

static IP_HOST: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+\.\d+\.\d+").unwrap());

/// Grades links for phishing risk using TLD reputation, brand impersonation,
/// transport, and structural heuristics.
pub struct PhishingAnalyzer;

impl PhishingAnalyzer {
    pub fn analyze_links(links: &[String]) -> Vec<LinkAnalysis> {
        links.iter().map(|l| Self::analyze_link(l)).collect()
    }

    pub fn analyze_link(link: &str) -> LinkAnalysis {
        let domain = match Self::domain_of(link) {
            Some(d) => d,
            None => {
                return LinkAnalysis {
                    url: link.to_string(),
                    domain: None,
                    risk: LinkRisk::Unknown,
                    risk_score: 50,
                    reasons: vec!["Could not analyze".to_string()],
                }
            }
        };

        if SAFE_DOMAINS.iter().any(|safe| domain.contains(safe)) {
            return LinkAnalysis {
                url: link.to_string(),
                domain: Some(domain),
                risk: LinkRisk::Low,
                risk_score: 10,
                reasons: vec!["Known trusted domain".to_string()],
            };
        }

        let mut score: u32 = 0;
        let mut reasons = Vec::new();

        if let Some(tld) = SUSPICIOUS_TLDS.iter().find(|tld| domain.ends_with(*tld)) {
            score += 40;
            reasons.push(format!("Suspicious TLD: {tld}"));
        }

        // Leet-normalize before the brand check so "amaz0n" still reads as
        // "amazon".
        let normalized_domain = normalize_leet(&domain);
        if let Some(brand) = TRUSTED_BRANDS
            .iter()
            .find(|brand| normalized_domain.contains(*brand))
        {
            score += 35;
            reasons.push(format!("Impersonates {}", brand.to_uppercase()));
        }

        if IP_HOST.is_match(&domain) {
            score += 30;
            reasons.push("Uses IP address instead of domain".to_string());
        }

        if domain.matches('.').count() > 3 {
            score += 15;
            reasons.push("Excessive subdomains".to_string());
        }

        if link.starts_with("http://") {
            score += 20;
            reasons.push("No HTTPS encryption".to_string());
        }

        let path = Self::path_of(link);
        for word in SUSPICIOUS_PATH_WORDS {
            if path.contains(word) {
                score += 10;
                reasons.push(format!("Suspicious path keyword: {word}"));
            }
        }

        let name = domain.split('.').next().unwrap_or("");
        let digit_count = name.chars().filter(|c| c.is_ascii_digit()).count();
        if name.len() > 20 || (name.len() > 8 && digit_count > 3) {
            score += 15;
            reasons.push("Random/generated domain name".to_string());
        }

        let score = score.min(100) as u8;
        if reasons.is_empty() {
            reasons.push("No specific risks detected".to_string());
        }

        LinkAnalysis {
            url: link.to_string(),
            domain: Some(domain),
            risk: LinkRisk::from_score(score),
            risk_score: score,
            reasons,
        }
    }

    fn domain_of(link: &str) -> Option<String> {
        let after_scheme = link.split("//").last()?;
        let domain = after_scheme
            .split('/')
            .next()?
            .split('?')
            .next()?
            .to_lowercase();
        if domain.is_empty() {
            None
        } else {
            Some(domain)
        }
    }

    fn path_of(link: &str) -> String {
        let after_scheme = link.split("//").last().unwrap_or("");
        match after_scheme.split_once('/') {
            Some((_, path)) => path.to_lowercase(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trusted_domain_short_circuits() {
        let a = PhishingAnalyzer::analyze_link("https://www.sbi.co.in/netbanking");
        assert_eq!(a.risk, LinkRisk::Low);
        assert_eq!(a.risk_score, 10);
        assert_eq!(a.reasons, vec!["Known trusted domain".to_string()]);
    }

    #[test]
    fn leet_brand_impersonation_on_throwaway_tld_is_critical() {
        let a = PhishingAnalyzer::analyze_link("http://amaz0n-deals.fake-site.xyz/claim");
        // 40 TLD + 35 brand + 20 plain HTTP.
        assert_eq!(a.risk_score, 95);
        assert_eq!(a.risk, LinkRisk::Critical);
        assert!(a.reasons.iter().any(|r| r.contains("AMAZON")));
    }

    #[test]
    fn ip_host_is_flagged() {
        let a = PhishingAnalyzer::analyze_link("http://192.168.4.12/verify");
        assert!(a.reasons.iter().any(|r| r.contains("IP address")));
        assert!(a.risk >= LinkRisk::High);
    }

    #[test]
    fn path_keywords_accumulate() {
        let a = PhishingAnalyzer::analyze_link("https://example-site.club/login/verify-otp");
        // 40 TLD + 10 login + 10 verify + 10 otp.
        assert_eq!(a.risk_score, 70);
        assert_eq!(a.risk, LinkRisk::Critical);
    }

    #[test]
    fn empty_host_is_unknown() {
        let a = PhishingAnalyzer::analyze_link("http:///nowhere");
        assert_eq!(a.risk, LinkRisk::Unknown);
        assert_eq!(a.risk_score, 50);
    }

    #[test]
    fn bland_https_link_scores_low() {
        let a = PhishingAnalyzer::analyze_link("https://weather.example.org/today");
        assert!(a.risk_score < 20);
        assert_eq!(a.risk, LinkRisk::Low);
    }
}
