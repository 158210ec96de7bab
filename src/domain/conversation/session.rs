//! The conversation session aggregate.

use super::message::{Message, MessageSender};
use super::persona::PersonaKey;
use super::phase::ConversationPhase;
use crate::domain::detection::DetectionVerdict;
use crate::domain::detection::{ScamCategory, ThreatLevel};
use crate::domain::extraction::EntitySet;
use crate::domain::foundation::{DomainError, SessionId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Replies remembered for deduplication.
const REPLY_MEMORY: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Completed,
}

/// One generation attempt that produced the reply for a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementRecord {
    pub provider: String,
    pub at: Timestamp,
}

/// Everything known about one conversation with one counterparty.
///
/// Detection fields only ever ratchet upward: once a session is flagged as
/// a scam it stays flagged, confidence keeps its maximum, and the threat
/// level never drops. A single noisy message must not clear an established
/// verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    id: SessionId,
    status: SessionStatus,
    created_at: Timestamp,
    updated_at: Timestamp,
    messages: Vec<Message>,
    scam_detected: bool,
    category: ScamCategory,
    confidence: f64,
    threat_level: ThreatLevel,
    entities: EntitySet,
    persona: Option<PersonaKey>,
    recent_replies: VecDeque<String>,
    engagements: Vec<EngagementRecord>,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        let now = Timestamp::now();
        Session {
            id,
            status: SessionStatus::Active,
            created_at: now,
            updated_at: now,
            messages: Vec::new(),
            scam_detected: false,
            category: ScamCategory::Unknown,
            confidence: 0.0,
            threat_level: ThreatLevel::Safe,
            entities: EntitySet::default(),
            persona: None,
            recent_replies: VecDeque::new(),
            engagements: Vec::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn scam_detected(&self) -> bool {
        self.scam_detected
    }

    pub fn category(&self) -> ScamCategory {
        self.category
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn threat_level(&self) -> ThreatLevel {
        self.threat_level
    }

    pub fn entities(&self) -> &EntitySet {
        &self.entities
    }

    pub fn persona(&self) -> Option<PersonaKey> {
        self.persona
    }

    /// The persona to speak as, before one has been formally assigned.
    pub fn effective_persona(&self) -> PersonaKey {
        self.persona.unwrap_or_default()
    }

    pub fn recent_replies(&self) -> &VecDeque<String> {
        &self.recent_replies
    }

    pub fn engagements(&self) -> &[EngagementRecord] {
        &self.engagements
    }

    pub fn counterparty_message_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_from_counterparty()).count()
    }

    pub fn phase(&self) -> ConversationPhase {
        ConversationPhase::from_message_count(self.counterparty_message_count())
    }

    /// Counterparty texts in arrival order, for whole-conversation analysis.
    pub fn counterparty_texts(&self) -> Vec<String> {
        self.messages
            .iter()
            .filter(|m| m.is_from_counterparty())
            .map(|m| m.text().to_string())
            .collect()
    }

    /// Imports an externally supplied transcript. Only allowed while the
    /// session is still empty, so a replayed request cannot duplicate the
    /// conversation.
    pub fn seed_history<I>(&mut self, turns: I)
    where
        I: IntoIterator<Item = (MessageSender, String)>,
    {
        if !self.messages.is_empty() {
            return;
        }
        for (sender, text) in turns {
            self.messages.push(Message::new(sender, text, Timestamp::now()));
        }
        self.touch();
    }

    pub fn record_counterparty_message(&mut self, text: &str) -> Result<(), DomainError> {
        self.ensure_active()?;
        self.messages.push(Message::from_counterparty(text));
        self.touch();
        Ok(())
    }

    pub fn record_agent_reply(&mut self, text: &str, provider: &str) -> Result<(), DomainError> {
        self.ensure_active()?;
        self.messages.push(Message::from_agent(text));
        if self.recent_replies.len() == REPLY_MEMORY {
            self.recent_replies.pop_front();
        }
        self.recent_replies.push_back(text.to_string());
        self.engagements.push(EngagementRecord {
            provider: provider.to_string(),
            at: Timestamp::now(),
        });
        self.touch();
        Ok(())
    }

    /// Folds a fresh verdict into the session, ratcheting every field.
    pub fn absorb_verdict(&mut self, verdict: &DetectionVerdict) {
        if verdict.scam_detected {
            self.scam_detected = true;
        }
        if verdict.confidence > self.confidence {
            self.confidence = verdict.confidence;
        }
        if verdict.threat_level > self.threat_level {
            self.threat_level = verdict.threat_level;
        }
        if verdict.category != ScamCategory::Unknown
            && (self.category == ScamCategory::Unknown || verdict.scam_detected)
        {
            self.category = verdict.category;
        }
        self.touch();
    }

    pub fn absorb_entities(&mut self, extracted: &EntitySet) {
        self.entities.merge(extracted);
        self.touch();
    }

    /// Assigns the persona for the rest of the session. A persona sticks
    /// once chosen; the counterparty must never see the character change.
    pub fn assign_persona(&mut self, key: PersonaKey) -> Result<(), DomainError> {
        if self.persona.is_some() {
            return Err(DomainError::PersonaAlreadyAssigned);
        }
        self.persona = Some(key);
        self.touch();
        Ok(())
    }

    pub fn complete(&mut self) {
        self.status = SessionStatus::Completed;
        self.touch();
    }

    fn ensure_active(&self) -> Result<(), DomainError> {
        match self.status {
            SessionStatus::Active => Ok(()),
            SessionStatus::Completed => Err(DomainError::SessionCompleted),
        }
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::detection::SignalDetector;
    use crate::domain::extraction::{EntityType, Extractor};

    fn session() -> Session {
        Session::new(SessionId::new())
    }

    #[test]
    fn verdict_fields_only_ratchet_upward() {
        let mut s = session();
        let scam = SignalDetector::analyze(
            "URGENT: your SBI account is blocked, share OTP immediately or face arrest",
            &[],
        );
        assert!(scam.scam_detected);
        s.absorb_verdict(&scam);
        let peak_confidence = s.confidence();
        let peak_threat = s.threat_level();

        let benign = SignalDetector::analyze("ok", &[]);
        s.absorb_verdict(&benign);

        assert!(s.scam_detected());
        assert_eq!(s.confidence(), peak_confidence);
        assert_eq!(s.threat_level(), peak_threat);
        assert_ne!(s.category(), ScamCategory::Unknown);
    }

    #[test]
    fn persona_is_assigned_exactly_once() {
        let mut s = session();
        assert_eq!(s.effective_persona(), PersonaKey::ConfusedElderly);
        s.assign_persona(PersonaKey::RetiredArmy).unwrap();
        assert_eq!(
            s.assign_persona(PersonaKey::VillageFarmer),
            Err(DomainError::PersonaAlreadyAssigned)
        );
        assert_eq!(s.effective_persona(), PersonaKey::RetiredArmy);
    }

    #[test]
    fn seed_history_is_ignored_once_messages_exist() {
        let mut s = session();
        s.record_counterparty_message("hello").unwrap();
        s.seed_history(vec![(MessageSender::Counterparty, "old text".to_string())]);
        assert_eq!(s.messages().len(), 1);
        assert_eq!(s.messages()[0].text(), "hello");
    }

    #[test]
    fn reply_memory_is_a_ring_buffer() {
        let mut s = session();
        for i in 0..20 {
            s.record_agent_reply(&format!("reply number {i}"), "rules").unwrap();
        }
        assert_eq!(s.recent_replies().len(), REPLY_MEMORY);
        assert_eq!(s.recent_replies().front().unwrap(), "reply number 5");
        assert_eq!(s.recent_replies().back().unwrap(), "reply number 19");
    }

    #[test]
    fn entities_accumulate_across_turns() {
        let mut s = session();
        s.absorb_entities(&Extractor::extract_all("call me on 9876543210"));
        s.absorb_entities(&Extractor::extract_all("pay to refund@ybl before 5pm"));
        assert!(s.entities().contains(EntityType::Phone, "9876543210"));
        assert!(s.entities().contains(EntityType::PaymentHandle, "refund@ybl"));
        assert_eq!(s.entities().count(EntityType::Phone), 1);
        assert_eq!(s.entities().count(EntityType::PaymentHandle), 1);
    }

    #[test]
    fn completed_session_rejects_new_messages() {
        let mut s = session();
        s.complete();
        assert_eq!(
            s.record_counterparty_message("hello"),
            Err(DomainError::SessionCompleted)
        );
        assert_eq!(
            s.record_agent_reply("hi", "rules"),
            Err(DomainError::SessionCompleted)
        );
    }

    #[test]
    fn phase_follows_counterparty_messages_only() {
        let mut s = session();
        assert_eq!(s.phase(), ConversationPhase::Opening);
        for _ in 0..4 {
            s.record_counterparty_message("share otp").unwrap();
            s.record_agent_reply("which otp beta?", "rules").unwrap();
        }
        assert_eq!(s.counterparty_message_count(), 4);
        assert_eq!(s.phase(), ConversationPhase::Probing);
    }
}
