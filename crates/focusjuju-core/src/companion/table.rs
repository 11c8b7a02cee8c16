//! Built-in, style-keyed companion lines.
//!
//! Acts both as a standalone [`MessageSource`] and as the fallback the
//! session host uses when another source fails. Tables are plain data:
//! callers can replace any style's encouragement set.

use std::collections::HashMap;
use std::future::ready;
use std::sync::Mutex;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;

use super::{MessageFuture, MessageSource, MessageStyle};
use crate::advice::{fallback_advice, Advice, AdviceContext};
use crate::goals::{fallback_breakdown, MicroGoal};

/// Lines the companion posts on lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLines {
    pub paused: String,
    pub resumed: String,
    pub completed: String,
    pub ended_early: String,
}

impl Default for StatusLines {
    fn default() -> Self {
        Self {
            paused: "Session paused. Take a short break, then we'll continue.".into(),
            resumed: "Session resumed. Let's continue focusing!".into(),
            completed: "Great job! You've completed the session!".into(),
            ended_early: "Session ended. You still made progress!".into(),
        }
    }
}

#[derive(Debug)]
pub struct MessageTable {
    encouragements: HashMap<MessageStyle, Vec<String>>,
    welcomes: HashMap<MessageStyle, String>,
    fallback_replies: HashMap<MessageStyle, String>,
    status: StatusLines,
    rng: Mutex<Mcg128Xsl64>,
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl MessageTable {
    /// The stock FocusJuju lines with an entropy-seeded picker.
    pub fn builtin() -> Self {
        Self::with_rng(Mcg128Xsl64::from_entropy())
    }

    /// Stock lines with a deterministic picker.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(Mcg128Xsl64::seed_from_u64(seed))
    }

    fn with_rng(rng: Mcg128Xsl64) -> Self {
        let mut encouragements = HashMap::new();
        encouragements.insert(
            MessageStyle::Friendly,
            lines(&[
                "You're doing great! Keep going! 👏",
                "I'm right here with you. You've got this!",
                "You're making progress, one step at a time!",
                "Keep up the good work! I'm here if you need me.",
                "You're focusing so well right now!",
            ]),
        );
        encouragements.insert(
            MessageStyle::Serious,
            lines(&[
                "Progress noted. Continuing as planned.",
                "You are maintaining good focus. Continue.",
                "Productivity levels optimal. Keep going.",
                "Task progression is on track.",
                "Focused work is happening. Excellent.",
            ]),
        );
        encouragements.insert(
            MessageStyle::Funny,
            lines(&[
                "Still awake? Just checking! 😴",
                "If focus were a sport, you'd be winning gold! 🥇",
                "Your brain cells are doing a happy dance right now! 💃",
                "Productivity level: Superhero! 🦸",
                "You're crushing this like it's a bug under your productivity shoe! 👞",
            ]),
        );
        encouragements.insert(
            MessageStyle::Motivational,
            lines(&[
                "PUSH THROUGH! YOU'VE GOT THIS! 💪",
                "EVERY SECOND COUNTS! MAKE IT HAPPEN! 🔥",
                "YOU ARE UNSTOPPABLE! KEEP CRUSHING IT! 🚀",
                "TRANSFORM YOUR DREAMS INTO REALITY! RIGHT NOW! ✨",
                "FEEL THE POWER OF YOUR FOCUS! YOU'RE INCREDIBLE! ⚡",
            ]),
        );

        let welcomes = HashMap::from([
            (
                MessageStyle::Friendly,
                "Let's focus together! I'll be right here with you.".to_string(),
            ),
            (
                MessageStyle::Serious,
                "Session initiated. Focus mode engaged. I will provide periodic updates.".to_string(),
            ),
            (
                MessageStyle::Funny,
                "Focus mode: ACTIVATED! 🚀 Let's show those distractions who's boss!".to_string(),
            ),
            (
                MessageStyle::Motivational,
                "LET'S CRUSH THIS SESSION! 💪 YOUR JOURNEY STARTS RIGHT NOW!".to_string(),
            ),
        ]);

        let fallback_replies = HashMap::from([
            (
                MessageStyle::Friendly,
                "I'm here with you! Let's keep going with your focus session. You're doing great! 💪"
                    .to_string(),
            ),
            (
                MessageStyle::Serious,
                "Continuing focus mode. I'm here if you need assistance with your task.".to_string(),
            ),
            (
                MessageStyle::Funny,
                "Oops! My brain had a mini vacation 🏝️ But I'm back now! Let's keep focusing!"
                    .to_string(),
            ),
            (
                MessageStyle::Motivational,
                "KEEP GOING! YOU'VE GOT THIS! I believe in your ability to achieve your goals!"
                    .to_string(),
            ),
        ]);

        Self {
            encouragements,
            welcomes,
            fallback_replies,
            status: StatusLines::default(),
            rng: Mutex::new(rng),
        }
    }

    /// Replace the encouragement set for one style. An empty set is ignored.
    pub fn with_encouragements(mut self, style: MessageStyle, messages: Vec<String>) -> Self {
        if !messages.is_empty() {
            self.encouragements.insert(style, messages);
        }
        self
    }

    pub fn with_status_lines(mut self, status: StatusLines) -> Self {
        self.status = status;
        self
    }

    /// Random line from the style's set, falling back to the friendly set.
    pub fn pick_encouragement(&self, style: MessageStyle) -> String {
        let set = self
            .encouragements
            .get(&style)
            .filter(|s| !s.is_empty())
            .or_else(|| self.encouragements.get(&MessageStyle::Friendly));
        let Some(set) = set else {
            return self.fallback_reply(style);
        };
        // A poisoned picker still holds a usable generator.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        set.choose(&mut *rng).cloned().unwrap_or_default()
    }

    pub fn encouragements(&self, style: MessageStyle) -> &[String] {
        self.encouragements.get(&style).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn welcome(&self, style: MessageStyle) -> String {
        self.welcomes
            .get(&style)
            .cloned()
            .unwrap_or_else(|| "Let's focus together!".to_string())
    }

    pub fn fallback_reply(&self, style: MessageStyle) -> String {
        self.fallback_replies
            .get(&style)
            .cloned()
            .unwrap_or_else(|| "I'm here to support you. Let's keep focusing together!".to_string())
    }

    pub fn status(&self) -> &StatusLines {
        &self.status
    }
}

impl Default for MessageTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MessageSource for MessageTable {
    fn encouragement(&self, style: MessageStyle) -> MessageFuture<String> {
        Box::pin(ready(Ok(self.pick_encouragement(style))))
    }

    fn reply(&self, style: MessageStyle, _user_message: &str) -> MessageFuture<String> {
        Box::pin(ready(Ok(self.fallback_reply(style))))
    }

    fn micro_goals(&self, _task: &str, _energy: u8) -> MessageFuture<Vec<MicroGoal>> {
        Box::pin(ready(Ok(fallback_breakdown())))
    }

    fn advice(&self, _context: &AdviceContext) -> MessageFuture<Advice> {
        Box::pin(ready(Ok(fallback_advice())))
    }
}
