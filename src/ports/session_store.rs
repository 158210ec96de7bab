//! Session persistence and cross-session intelligence ports.

use async_trait::async_trait;

use crate::domain::conversation::Session;
use crate::domain::extraction::EntitySet;
use crate::domain::foundation::SessionId;

/// Port for session persistence.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads a session, or creates a fresh one under the given id.
    async fn load_or_create(&self, id: SessionId) -> Result<Session, SessionStoreError>;

    async fn save(&self, session: &Session) -> Result<(), SessionStoreError>;
}

/// Port for cross-session entity correlation.
///
/// A phone number or payment handle that shows up in a second conversation
/// marks a repeat counterparty, which feeds the engagement score.
#[async_trait]
pub trait EntityLedger: Send + Sync {
    /// Records high-value entities seen in a session.
    async fn record(&self, session: SessionId, entities: &EntitySet)
        -> Result<(), SessionStoreError>;

    /// True when any high-value entity was already seen in a different
    /// session.
    async fn seen_elsewhere(
        &self,
        session: SessionId,
        entities: &EntitySet,
    ) -> Result<bool, SessionStoreError>;
}

/// Session storage errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("session not found: {0}")]
    NotFound(SessionId),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}
