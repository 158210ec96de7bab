//! Conversation messages.

use crate::domain::foundation::Timestamp;
use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageSender {
    /// The suspected scammer on the other end.
    #[serde(rename = "scammer")]
    Counterparty,
    /// Our persona-driven agent.
    #[serde(rename = "user")]
    Agent,
}

/// Immutable conversation message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    sender: MessageSender,
    text: String,
    timestamp: Timestamp,
}

impl Message {
    pub fn new(sender: MessageSender, text: impl Into<String>, timestamp: Timestamp) -> Self {
        Message {
            sender,
            text: text.into(),
            timestamp,
        }
    }

    pub fn from_counterparty(text: impl Into<String>) -> Self {
        Self::new(MessageSender::Counterparty, text, Timestamp::now())
    }

    pub fn from_agent(text: impl Into<String>) -> Self {
        Self::new(MessageSender::Agent, text, Timestamp::now())
    }

    pub fn sender(&self) -> MessageSender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn is_from_counterparty(&self) -> bool {
        self.sender == MessageSender::Counterparty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_serializes_to_wire_labels() {
        assert_eq!(
            serde_json::to_string(&MessageSender::Counterparty).unwrap(),
            "\"scammer\""
        );
        assert_eq!(serde_json::to_string(&MessageSender::Agent).unwrap(), "\"user\"");
    }

    #[test]
    fn message_exposes_fields_read_only() {
        let m = Message::from_counterparty("send otp");
        assert!(m.is_from_counterparty());
        assert_eq!(m.text(), "send otp");
    }
}
