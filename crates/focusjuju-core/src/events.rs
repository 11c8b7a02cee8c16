use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{SessionKind, SessionRef};

/// Who wrote a chat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Companion,
    User,
}

/// What a companion chat line is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Welcome,
    Encouragement,
    Status,
    Reply,
    Chat,
}

/// One line of the session chat log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub kind: MessageKind,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn companion(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Companion,
            kind,
            text: text.into(),
            at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            kind: MessageKind::Chat,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// Collaborator that failed without affecting the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSource {
    Persistence,
    MessageSource,
}

/// Every state change of a session produces an Event.
/// Presentation layers consume them; nothing feeds them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session: SessionRef,
        kind: SessionKind,
        task_label: String,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        session: SessionRef,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    SessionEndedEarly {
        session: SessionRef,
        elapsed_secs: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Message(ChatMessage),
    /// Non-fatal collaborator failure; the session carried on.
    Warning {
        source: WarningSource,
        message: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn warning(source: WarningSource, message: impl Into<String>) -> Self {
        Event::Warning {
            source,
            message: message.into(),
            at: Utc::now(),
        }
    }

    /// True for the two events that close a session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Event::SessionCompleted { .. } | Event::SessionEndedEarly { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = Event::SessionPaused {
            remaining_secs: 42,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "SessionPaused");
        assert_eq!(json["remaining_secs"], 42);
    }

    #[test]
    fn chat_messages_carry_sender_and_kind() {
        let msg = ChatMessage::companion(MessageKind::Encouragement, "Keep going");
        let json = serde_json::to_value(Event::Message(msg)).unwrap();
        assert_eq!(json["type"], "Message");
        assert_eq!(json["sender"], "companion");
        assert_eq!(json["kind"], "encouragement");
    }
}
