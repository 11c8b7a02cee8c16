//! Companion message sources.
//!
//! The session core only needs text: an encouragement for a style, a reply
//! to something the user typed, a task breakdown and a piece of personal
//! advice. Where that text
//! comes from is pluggable through [`MessageSource`]: the built-in
//! [`MessageTable`] or a hosted language model ([`LlmMessageSource`]).

pub mod llm;
pub mod table;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::advice::{Advice, AdviceContext};
use crate::error::{MessageError, ValidationError};
use crate::goals::MicroGoal;

pub use llm::LlmMessageSource;
pub use table::MessageTable;

/// Tone the companion writes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStyle {
    #[default]
    Friendly,
    Serious,
    Funny,
    Motivational,
}

impl MessageStyle {
    pub const ALL: [MessageStyle; 4] = [
        MessageStyle::Friendly,
        MessageStyle::Serious,
        MessageStyle::Funny,
        MessageStyle::Motivational,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MessageStyle::Friendly => "friendly",
            MessageStyle::Serious => "serious",
            MessageStyle::Funny => "funny",
            MessageStyle::Motivational => "motivational",
        }
    }
}

impl fmt::Display for MessageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageStyle {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageStyle::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownVariant {
                kind: "message style",
                value: s.to_string(),
            })
    }
}

/// Boxed future returned by message sources. `'static` and `Send` so the
/// session host can run it on its own task without blocking the countdown.
pub type MessageFuture<T> = Pin<Box<dyn Future<Output = Result<T, MessageError>> + Send + 'static>>;

/// Anything that can write companion text.
pub trait MessageSource: Send + Sync {
    /// A short supportive line for a running session.
    fn encouragement(&self, style: MessageStyle) -> MessageFuture<String>;

    /// Answer to a chat message the user sent mid-session.
    fn reply(&self, style: MessageStyle, user_message: &str) -> MessageFuture<String>;

    /// Break `task` into micro-goals. `energy` is the user's current energy
    /// on the 1..=5 mood scale.
    fn micro_goals(&self, task: &str, energy: u8) -> MessageFuture<Vec<MicroGoal>>;

    /// Advice for the user's current state and recent sessions.
    fn advice(&self, context: &AdviceContext) -> MessageFuture<Advice>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_parses_case_insensitively() {
        assert_eq!("Serious".parse::<MessageStyle>().unwrap(), MessageStyle::Serious);
        assert_eq!(" funny ".parse::<MessageStyle>().unwrap(), MessageStyle::Funny);
        assert!("sarcastic".parse::<MessageStyle>().is_err());
        assert_eq!(MessageStyle::default(), MessageStyle::Friendly);
    }
}
