//! Extracted entity types and the set container that accumulates them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Kinds of intelligence the extractor can surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    #[serde(rename = "phoneNumbers")]
    Phone,
    #[serde(rename = "upiIds")]
    PaymentHandle,
    #[serde(rename = "bankAccounts")]
    BankAccount,
    #[serde(rename = "ifscCodes")]
    RoutingCode,
    #[serde(rename = "phishingLinks")]
    Link,
    #[serde(rename = "emailAddresses")]
    Email,
    #[serde(rename = "aadhaarNumbers")]
    NationalId,
    #[serde(rename = "panNumbers")]
    TaxId,
    #[serde(rename = "cryptoAddresses")]
    CryptoAddress,
    #[serde(rename = "appsUsed")]
    ToolMention,
    #[serde(rename = "claimedDesignations")]
    ClaimedRole,
    #[serde(rename = "claimedOrganizations")]
    ClaimedOrg,
    #[serde(rename = "suspiciousKeywords")]
    Keyword,
}

impl EntityType {
    pub const ALL: [EntityType; 13] = [
        EntityType::Phone,
        EntityType::PaymentHandle,
        EntityType::BankAccount,
        EntityType::RoutingCode,
        EntityType::Link,
        EntityType::Email,
        EntityType::NationalId,
        EntityType::TaxId,
        EntityType::CryptoAddress,
        EntityType::ToolMention,
        EntityType::ClaimedRole,
        EntityType::ClaimedOrg,
        EntityType::Keyword,
    ];

    /// High-value types counted for the intelligence summary.
    pub fn is_high_value(&self) -> bool {
        matches!(
            self,
            EntityType::Phone | EntityType::PaymentHandle | EntityType::BankAccount
        )
    }
}

/// Deduplicated set of extracted entities, keyed by type.
///
/// Values only ever accumulate; there is no removal operation, so merging a
/// newer extraction into a session can never lose intelligence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntitySet(BTreeMap<EntityType, BTreeSet<String>>);

impl EntitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity_type: EntityType, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.0.entry(entity_type).or_default().insert(value);
        }
    }

    pub fn insert_all<I, S>(&mut self, entity_type: EntityType, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.insert(entity_type, value);
        }
    }

    /// Union-merges another set into this one.
    pub fn merge(&mut self, other: &EntitySet) {
        for (ty, values) in &other.0 {
            self.0.entry(*ty).or_default().extend(values.iter().cloned());
        }
    }

    pub fn values(&self, entity_type: EntityType) -> impl Iterator<Item = &str> {
        self.0
            .get(&entity_type)
            .into_iter()
            .flat_map(|s| s.iter().map(String::as_str))
    }

    pub fn contains(&self, entity_type: EntityType, value: &str) -> bool {
        self.0
            .get(&entity_type)
            .map(|s| s.contains(value))
            .unwrap_or(false)
    }

    pub fn count(&self, entity_type: EntityType) -> usize {
        self.0.get(&entity_type).map(BTreeSet::len).unwrap_or(0)
    }

    /// Total entities across all types.
    pub fn total(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }

    /// Total entities of high-value types.
    pub fn high_value_count(&self) -> usize {
        EntityType::ALL
            .iter()
            .filter(|t| t.is_high_value())
            .map(|t| self.count(*t))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeSet::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityType, &BTreeSet<String>)> {
        self.0.iter().map(|(t, v)| (*t, v))
    }
}
