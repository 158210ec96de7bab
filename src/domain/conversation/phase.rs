//! Conversation phases.

use serde::{Deserialize, Serialize};

/// Where the engagement currently sits, derived purely from how many
/// counterparty messages have arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    Opening,
    BuildingTrust,
    Probing,
    Extracting,
    Closing,
}

impl ConversationPhase {
    /// Phase thresholds: 1 / 3 / 5 / 8 counterparty messages.
    pub fn from_message_count(count: usize) -> Self {
        if count <= 1 {
            ConversationPhase::Opening
        } else if count <= 3 {
            ConversationPhase::BuildingTrust
        } else if count <= 5 {
            ConversationPhase::Probing
        } else if count <= 8 {
            ConversationPhase::Extracting
        } else {
            ConversationPhase::Closing
        }
    }

    /// Index into a persona's per-phase response pools.
    pub fn pool_index(&self) -> usize {
        match self {
            ConversationPhase::Opening => 0,
            ConversationPhase::BuildingTrust => 1,
            ConversationPhase::Probing => 2,
            ConversationPhase::Extracting => 3,
            ConversationPhase::Closing => 4,
        }
    }

    /// Prompt directive steering the generated reply for this phase.
    pub fn directive(&self) -> &'static str {
        match self {
            ConversationPhase::Opening => {
                "OPENING: React with genuine emotion. Fear, confusion, or excitement depending \
                 on the scam. Don't ask too many questions yet. Show you're a real person who \
                 just received this."
            }
            ConversationPhase::BuildingTrust => {
                "BUILDING TRUST: The scammer thinks you're falling for it. ACT LIKE YOU ARE. \
                 Cooperate but stall with realistic excuses (searching for glasses, phone slow, \
                 someone at door). Slip in ONE innocent question about them."
            }
            ConversationPhase::Probing => {
                "PROBING: Keep cooperating slowly. Act close to complying but keep hitting \
                 small obstacles. Start asking casual questions about who they are and where \
                 they call from."
            }
            ConversationPhase::Extracting => {
                "EXTRACTING: You seem hooked. Now push for THEIR details naturally. Say things \
                 like 'my son/wife/CA wants to know' or 'for my records'. Ask for name, phone, \
                 branch, employee ID - ONE per message."
            }
            ConversationPhase::Closing => {
                "CLOSING: Bring in authority. 'My son just came' or 'police uncle is here'. \
                 Push HARD for their identity. Create urgency on YOUR side."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_boundaries() {
        assert_eq!(ConversationPhase::from_message_count(0), ConversationPhase::Opening);
        assert_eq!(ConversationPhase::from_message_count(1), ConversationPhase::Opening);
        assert_eq!(ConversationPhase::from_message_count(2), ConversationPhase::BuildingTrust);
        assert_eq!(ConversationPhase::from_message_count(3), ConversationPhase::BuildingTrust);
        assert_eq!(ConversationPhase::from_message_count(4), ConversationPhase::Probing);
        assert_eq!(ConversationPhase::from_message_count(5), ConversationPhase::Probing);
        assert_eq!(ConversationPhase::from_message_count(6), ConversationPhase::Extracting);
        assert_eq!(ConversationPhase::from_message_count(8), ConversationPhase::Extracting);
        assert_eq!(ConversationPhase::from_message_count(9), ConversationPhase::Closing);
        assert_eq!(ConversationPhase::from_message_count(100), ConversationPhase::Closing);
    }

    #[test]
    fn phases_are_monotonic_in_message_count() {
        let mut last = ConversationPhase::Opening;
        for count in 0..20 {
            let phase = ConversationPhase::from_message_count(count);
            assert!(phase >= last);
            last = phase;
        }
    }

    #[test]
    fn every_phase_has_a_directive_and_pool() {
        for phase in [
            ConversationPhase::Opening,
            ConversationPhase::BuildingTrust,
            ConversationPhase::Probing,
            ConversationPhase::Extracting,
            ConversationPhase::Closing,
        ] {
            assert!(!phase.directive().is_empty());
            assert!(phase.pool_index() < 5);
        }
    }
}
