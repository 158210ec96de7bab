//! Deterministic intelligence extraction.
//!
//! Pulls actionable identifiers (phones, payment handles, accounts, links,
//! documents) out of conversation text with fixed regexes, and grades
//! extracted links for phishing risk.

mod entity;
mod extractor;
mod phishing;

pub use entity::{EntitySet, EntityType};
pub use extractor::Extractor;
pub use phishing::{LinkAnalysis, LinkRisk, PhishingAnalyzer};
