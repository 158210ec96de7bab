//! The engagement pipeline: one counterparty message in, one persona reply
//! and a full analysis out.

use std::sync::Arc;

use rand::thread_rng;
use tracing::{debug, info, warn};

use crate::adapters::ai::FallbackChain;
use crate::domain::behavior::{
    BehaviorAnalyzer, BehaviorFingerprint, ConsistencyChecker, ConsistencyReport, FrustrationTracker,
    ThreatReport, ThreatScorer,
};
use crate::domain::conversation::{
    ConversationPhase, MessageSender, PersonaKey, PromptBuilder, ResponseDeduplicator, Session,
    SessionStatus,
};
use crate::domain::detection::{DetectionVerdict, SignalDetector};
use crate::domain::extraction::{EntitySet, EntityType, Extractor, LinkAnalysis, PhishingAnalyzer};
use crate::domain::foundation::{DomainError, SessionId};
use crate::ports::{EntityLedger, GenerationRequest, SessionStore, SessionStoreError};

/// Sessions auto-complete once the transcript reaches this many messages.
const MAX_SESSION_MESSAGES: usize = 100;

/// Provider label for rule-based replies.
const RULES_PROVIDER: &str = "rules";

/// One incoming counterparty message.
#[derive(Debug, Clone)]
pub struct EngagementRequest {
    pub session_id: SessionId,
    pub text: String,
    /// Prior transcript supplied by the caller, used only when the session
    /// has no messages yet.
    pub history: Vec<(MessageSender, String)>,
}

impl EngagementRequest {
    pub fn new(session_id: SessionId, text: impl Into<String>) -> Self {
        EngagementRequest {
            session_id,
            text: text.into(),
            history: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<(MessageSender, String)>) -> Self {
        self.history = history;
        self
    }
}

/// Everything produced for one turn.
#[derive(Debug, Clone)]
pub struct EngagementOutcome {
    pub reply: String,
    pub provider: String,
    pub verdict: DetectionVerdict,
    pub behavior: BehaviorFingerprint,
    pub consistency: ConsistencyReport,
    pub threat: ThreatReport,
    pub link_analyses: Vec<LinkAnalysis>,
    pub entities: EntitySet,
    pub frustration: u8,
    /// How well the session is going for us, 0-100.
    pub engagement_score: u8,
    pub persona: PersonaKey,
    pub persona_name: &'static str,
    pub phase: ConversationPhase,
    pub message_count: usize,
    pub repeat_counterparty: bool,
    pub session_status: SessionStatus,
}

/// Pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum EngageError {
    #[error(transparent)]
    Store(#[from] SessionStoreError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Drives a full engagement turn against one session.
pub struct EngagementHandler {
    store: Arc<dyn SessionStore>,
    ledger: Arc<dyn EntityLedger>,
    chain: FallbackChain,
}

impl EngagementHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        ledger: Arc<dyn EntityLedger>,
        chain: FallbackChain,
    ) -> Self {
        EngagementHandler { store, ledger, chain }
    }

    /// Processes one message end to end: detect, extract, analyze, reply.
    pub async fn engage(&self, request: EngagementRequest) -> Result<EngagementOutcome, EngageError> {
        let text = request.text.trim().to_string();
        let mut session = self.store.load_or_create(request.session_id).await?;

        if text.is_empty() {
            return Ok(Self::empty_message_outcome(&session));
        }

        if !request.history.is_empty() {
            session.seed_history(request.history);
        }
        session.record_counterparty_message(&text)?;

        // Detection runs over the whole transcript so context from earlier
        // turns keeps short follow-ups flagged.
        let prior: Vec<String> = session.messages()[..session.messages().len() - 1]
            .iter()
            .map(|m| m.text().to_string())
            .collect();
        let verdict = SignalDetector::analyze(&text, &prior);
        if verdict.scam_detected && !session.scam_detected() {
            info!(
                session = %session.id(),
                category = %verdict.category,
                confidence = verdict.confidence,
                "scam detected"
            );
        }
        session.absorb_verdict(&verdict);

        if session.persona().is_none() {
            let key = {
                let mut rng = thread_rng();
                PersonaKey::select(verdict.sophistication, verdict.detected_language, &mut rng)
            };
            session.assign_persona(key)?;
            debug!(session = %session.id(), persona = ?key, "persona assigned");
        }

        // Intelligence accumulates over the full transcript, not just the
        // newest message.
        let all_text: Vec<String> =
            session.messages().iter().map(|m| m.text().to_string()).collect();
        let extracted = Extractor::extract_all(&all_text.join(" "));
        session.absorb_entities(&extracted);
        self.ledger.record(session.id(), session.entities()).await?;
        let repeat_counterparty = self
            .ledger
            .seen_elsewhere(session.id(), session.entities())
            .await?;

        let reply = self.produce_reply(&session, &text, &verdict).await;
        session.record_agent_reply(&reply.0, &reply.1)?;
        let (reply_text, provider) = reply;

        let behavior = BehaviorAnalyzer::analyze(session.messages());
        let consistency = ConsistencyChecker::check(session.messages());
        let links: Vec<String> = session
            .entities()
            .values(EntityType::Link)
            .map(String::from)
            .collect();
        let link_analyses = PhishingAnalyzer::analyze_links(&links);
        let threat = ThreatScorer::score(
            &verdict,
            &behavior,
            &consistency,
            session.entities(),
            &link_analyses,
        );
        let frustration = FrustrationTracker::score(session.messages());

        let intel_count = session.entities().total();
        let engagement_score = Self::engagement_score(
            session.messages().len(),
            intel_count,
            frustration,
            behavior.tactics_count(),
            &provider,
            repeat_counterparty,
        );

        if session.messages().len() >= MAX_SESSION_MESSAGES {
            session.complete();
            info!(session = %session.id(), "session auto-completed");
        }

        let outcome = EngagementOutcome {
            reply: reply_text,
            provider,
            verdict,
            behavior,
            consistency,
            threat,
            link_analyses,
            entities: session.entities().clone(),
            frustration,
            engagement_score,
            persona: session.effective_persona(),
            persona_name: session.effective_persona().profile().name,
            phase: session.phase(),
            message_count: session.messages().len(),
            repeat_counterparty,
            session_status: session.status(),
        };

        self.store.save(&session).await?;
        Ok(outcome)
    }

    /// Generates the reply: provider chain first, with one regeneration on
    /// a semantic repeat, then the rule-based persona pools.
    async fn produce_reply(
        &self,
        session: &Session,
        text: &str,
        verdict: &DetectionVerdict,
    ) -> (String, String) {
        let persona_key = session.effective_persona();
        let persona = persona_key.profile();
        let phase = session.phase();
        let previous: Vec<String> = session.recent_replies().iter().cloned().collect();
        // The current message is quoted separately in the prompt.
        let window = &session.messages()[..session.messages().len() - 1];

        let builder = PromptBuilder::new(
            persona,
            phase,
            verdict.category,
            verdict.detected_language,
            verdict.sophistication,
        );
        let prompt = builder.build(text, window);

        if let Some(generated) = self
            .chain
            .generate(&GenerationRequest::new(prompt), persona.name)
            .await
        {
            if !ResponseDeduplicator::is_repeat(&generated.text, &previous) {
                return (generated.text, generated.provider);
            }

            // One retry with the rejected reply excluded.
            warn!(session = %session.id(), "generated reply repeats itself, regenerating");
            let avoid = vec![generated.text.clone()];
            let retry_prompt = PromptBuilder::new(
                persona,
                phase,
                verdict.category,
                verdict.detected_language,
                verdict.sophistication,
            )
            .avoiding(&avoid)
            .build(text, window);

            if let Some(second) = self
                .chain
                .generate(&GenerationRequest::new(retry_prompt), persona.name)
                .await
            {
                if !ResponseDeduplicator::is_repeat(&second.text, &previous) {
                    return (second.text, second.provider);
                }
            }
            // A repeat from a live model still beats a canned line.
            return (generated.text, generated.provider);
        }

        let mut rng = thread_rng();
        let reply = persona.fallback_reply(phase, text, &previous, &mut rng);
        (reply, RULES_PROVIDER.to_string())
    }

    fn engagement_score(
        message_count: usize,
        intel_count: usize,
        frustration: u8,
        tactics: usize,
        provider: &str,
        repeat_counterparty: bool,
    ) -> u8 {
        let mut score = message_count as f64 * 4.0
            + intel_count as f64 * 10.0
            + frustration as f64 * 0.3
            + tactics as f64 * 5.0;
        if provider != RULES_PROVIDER {
            score += 10.0;
        }
        if repeat_counterparty {
            score += 15.0;
        }
        score.min(100.0) as u8
    }

    fn empty_message_outcome(session: &Session) -> EngagementOutcome {
        let verdict = DetectionVerdict::empty("Empty message");
        let behavior = BehaviorAnalyzer::analyze(&[]);
        let consistency = ConsistencyChecker::check(&[]);
        let threat = ThreatScorer::score(
            &verdict,
            &behavior,
            &consistency,
            &EntitySet::default(),
            &[],
        );
        EngagementOutcome {
            reply: "Sorry, I didn't receive your message. Can you repeat?".to_string(),
            provider: RULES_PROVIDER.to_string(),
            verdict,
            behavior,
            consistency,
            threat,
            link_analyses: Vec::new(),
            entities: EntitySet::default(),
            frustration: 0,
            engagement_score: 0,
            persona: session.effective_persona(),
            persona_name: session.effective_persona().profile().name,
            phase: session.phase(),
            message_count: session.messages().len(),
            repeat_counterparty: false,
            session_status: session.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockGenerationProvider;
    use crate::adapters::session::{InMemoryEntityLedger, InMemorySessionStore};
    use std::time::Duration;

    fn handler_with_chain(chain: FallbackChain) -> EngagementHandler {
        EngagementHandler::new(
            Arc::new(InMemorySessionStore::new()),
            Arc::new(InMemoryEntityLedger::new()),
            chain,
        )
    }

    fn handler() -> EngagementHandler {
        handler_with_chain(FallbackChain::new())
    }

    #[tokio::test]
    async fn empty_message_gets_canned_reply() {
        let handler = handler();
        let outcome = handler
            .engage(EngagementRequest::new(SessionId::new(), "   "))
            .await
            .unwrap();
        assert_eq!(outcome.reply, "Sorry, I didn't receive your message. Can you repeat?");
        assert_eq!(outcome.provider, "rules");
        assert!(!outcome.verdict.scam_detected);
        assert_eq!(outcome.message_count, 0);
    }

    #[tokio::test]
    async fn scam_message_is_flagged_and_answered() {
        let handler = handler();
        let outcome = handler
            .engage(EngagementRequest::new(
                SessionId::new(),
                "URGENT: Your SBI account will be blocked today. Share OTP immediately to verify.",
            ))
            .await
            .unwrap();

        assert!(outcome.verdict.scam_detected);
        assert!(outcome.verdict.confidence >= 0.35);
        assert_eq!(outcome.provider, "rules");
        assert!(!outcome.reply.is_empty());
        assert_eq!(outcome.message_count, 2);
        assert_eq!(outcome.phase, ConversationPhase::Opening);
    }

    #[tokio::test]
    async fn intelligence_accumulates_across_turns() {
        let handler = handler();
        let sid = SessionId::new();

        handler
            .engage(EngagementRequest::new(
                sid,
                "Transfer the fine to account 12345678901 immediately or face arrest",
            ))
            .await
            .unwrap();
        let outcome = handler
            .engage(EngagementRequest::new(sid, "Or pay to scammer@ybl right now"))
            .await
            .unwrap();

        assert!(outcome.entities.contains(EntityType::BankAccount, "12345678901"));
        assert!(outcome.entities.contains(EntityType::PaymentHandle, "scammer@ybl"));
        assert_eq!(outcome.message_count, 4);
    }

    #[tokio::test]
    async fn persona_sticks_for_the_whole_session() {
        let handler = handler();
        let sid = SessionId::new();

        let first = handler
            .engage(EngagementRequest::new(sid, "Your KYC expired, verify immediately"))
            .await
            .unwrap();
        let second = handler
            .engage(EngagementRequest::new(sid, "Share your OTP now to continue"))
            .await
            .unwrap();

        assert_eq!(first.persona, second.persona);
    }

    #[tokio::test]
    async fn provider_reply_is_sanitized_and_used() {
        let provider = MockGenerationProvider::named("primary")
            .with_response("\"Haan beta, which OTP? My grandson handles phone...\"");
        let chain = FallbackChain::new()
            .with_provider(Arc::new(provider), Duration::from_secs(1));
        let handler = handler_with_chain(chain);

        let outcome = handler
            .engage(EngagementRequest::new(
                SessionId::new(),
                "Share your OTP immediately or account will be blocked",
            ))
            .await
            .unwrap();

        assert_eq!(outcome.provider, "primary");
        assert_eq!(outcome.reply, "Haan beta, which OTP? My grandson handles phone...");
    }

    #[tokio::test]
    async fn repeated_reply_triggers_one_regeneration() {
        // Both first attempts echo a previous reply; the retry breaks the tie.
        let provider = MockGenerationProvider::named("primary")
            .with_response("What is OTP beta? I am confused")
            .with_response("otp kya hai? samajh nahi aaya")
            .with_response("Which branch are you calling from, beta?");
        let chain = FallbackChain::new()
            .with_provider(Arc::new(provider.clone()), Duration::from_secs(1));
        let handler = handler_with_chain(chain);
        let sid = SessionId::new();

        handler
            .engage(EngagementRequest::new(sid, "Share OTP now or account blocked"))
            .await
            .unwrap();
        let second = handler
            .engage(EngagementRequest::new(sid, "I said send the OTP immediately!"))
            .await
            .unwrap();

        assert_eq!(provider.call_count(), 3);
        assert_eq!(second.reply, "Which branch are you calling from, beta?");
    }

    #[tokio::test]
    async fn seeded_history_raises_context_for_short_messages() {
        let handler = handler();
        let history = vec![
            (
                MessageSender::Counterparty,
                "Your SBI account is blocked, share OTP and pay penalty immediately".to_string(),
            ),
            (MessageSender::Agent, "Haan? Which account?".to_string()),
        ];

        let outcome = handler
            .engage(
                EngagementRequest::new(SessionId::new(), "ok").with_history(history),
            )
            .await
            .unwrap();

        assert!(outcome.verdict.scam_detected);
        assert_eq!(outcome.message_count, 4);
    }

    #[tokio::test]
    async fn engagement_score_rewards_intel_and_live_providers() {
        assert_eq!(EngagementHandler::engagement_score(2, 0, 0, 0, "rules", false), 8);
        assert_eq!(
            EngagementHandler::engagement_score(2, 2, 0, 1, "groq:llama-3.1-8b-instant", false),
            43
        );
        assert_eq!(
            EngagementHandler::engagement_score(20, 10, 100, 10, "rules", true),
            100
        );
    }
}
