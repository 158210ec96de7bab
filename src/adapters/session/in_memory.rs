//! In-memory session store and entity ledger.
//!
//! Backing the engine with process memory keeps a single-node deployment
//! simple; both adapters sit behind ports so a persistent store can replace
//! them without touching the pipeline.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::Session;
use crate::domain::extraction::{EntitySet, EntityType};
use crate::domain::foundation::SessionId;
use crate::ports::{EntityLedger, SessionStore, SessionStoreError};

/// Thread-safe in-memory session store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load_or_create(&self, id: SessionId) -> Result<Session, SessionStoreError> {
        if let Some(session) = self.sessions.read().await.get(&id) {
            return Ok(session.clone());
        }
        Ok(Session::new(id))
    }

    async fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        self.sessions
            .write()
            .await
            .insert(session.id(), session.clone());
        Ok(())
    }
}

/// In-memory cross-session entity index.
///
/// Maps each high-value entity to the sessions it appeared in, so a phone
/// number reused across conversations marks a repeat counterparty.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntityLedger {
    seen: Arc<RwLock<HashMap<String, HashSet<SessionId>>>>,
}

impl InMemoryEntityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn ledger_keys(entities: &EntitySet) -> Vec<String> {
        EntityType::ALL
            .iter()
            .filter(|t| t.is_high_value())
            .flat_map(|t| entities.values(*t).map(move |v| format!("{t:?}:{v}")))
            .collect()
    }
}

#[async_trait]
impl EntityLedger for InMemoryEntityLedger {
    async fn record(
        &self,
        session: SessionId,
        entities: &EntitySet,
    ) -> Result<(), SessionStoreError> {
        let mut seen = self.seen.write().await;
        for key in Self::ledger_keys(entities) {
            seen.entry(key).or_default().insert(session);
        }
        Ok(())
    }

    async fn seen_elsewhere(
        &self,
        session: SessionId,
        entities: &EntitySet,
    ) -> Result<bool, SessionStoreError> {
        let seen = self.seen.read().await;
        Ok(Self::ledger_keys(entities).iter().any(|key| {
            seen.get(key)
                .is_some_and(|sessions| sessions.iter().any(|s| *s != session))
        }))
    }
}
