//! What a presentation layer sees of a session.
//!
//! The session host publishes a fresh [`SessionView`] on every change. The
//! avatar mood is derived from the phase, with short-lived overrides when
//! the companion speaks or is waiting on a reply.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::session::SessionPhase;

/// How long an expressive mood stays before falling back to the phase mood.
pub const MOOD_HOLD: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvatarMood {
    Idle,
    Focused,
    Thinking,
    Encouraging,
    Happy,
}

impl AvatarMood {
    pub fn for_phase(phase: SessionPhase) -> Self {
        match phase {
            SessionPhase::Setup => AvatarMood::Idle,
            SessionPhase::Running => AvatarMood::Focused,
            SessionPhase::Paused => AvatarMood::Thinking,
            SessionPhase::Completed | SessionPhase::EndedEarly => AvatarMood::Happy,
        }
    }
}

/// Temporary mood override.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvatarState {
    held: Option<(AvatarMood, Option<Instant>)>,
}

impl AvatarState {
    /// Show `mood` for [`MOOD_HOLD`] starting at `now`.
    pub fn flash(&mut self, mood: AvatarMood, now: Instant) {
        self.held = Some((mood, Some(now + MOOD_HOLD)));
    }

    /// Show `mood` until [`AvatarState::release`].
    pub fn hold(&mut self, mood: AvatarMood) {
        self.held = Some((mood, None));
    }

    pub fn release(&mut self) {
        self.held = None;
    }

    pub fn current(&self, phase: SessionPhase, now: Instant) -> AvatarMood {
        // Terminal phases always celebrate.
        if phase.is_terminal() {
            return AvatarMood::Happy;
        }
        match self.held {
            Some((mood, None)) => mood,
            Some((mood, Some(until))) if now < until => mood,
            _ => AvatarMood::for_phase(phase),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub remaining_secs: u64,
    pub duration_secs: u64,
    pub task_label: String,
    pub last_message: Option<String>,
    pub mood: AvatarMood,
    /// Most recent non-fatal collaborator failure, if any.
    pub warning: Option<String>,
    pub sound_enabled: bool,
}

impl SessionView {
    /// `MM:SS` countdown text.
    pub fn clock(&self) -> String {
        format_clock(self.remaining_secs)
    }
}

pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_moods() {
        assert_eq!(AvatarMood::for_phase(SessionPhase::Setup), AvatarMood::Idle);
        assert_eq!(AvatarMood::for_phase(SessionPhase::Running), AvatarMood::Focused);
        assert_eq!(AvatarMood::for_phase(SessionPhase::Paused), AvatarMood::Thinking);
        assert_eq!(AvatarMood::for_phase(SessionPhase::EndedEarly), AvatarMood::Happy);
    }

    #[test]
    fn flashed_mood_expires() {
        let t0 = Instant::now();
        let mut avatar = AvatarState::default();
        avatar.flash(AvatarMood::Encouraging, t0);
        assert_eq!(avatar.current(SessionPhase::Running, t0), AvatarMood::Encouraging);
        assert_eq!(
            avatar.current(SessionPhase::Running, t0 + MOOD_HOLD),
            AvatarMood::Focused
        );
    }

    #[test]
    fn held_mood_stays_until_released_but_not_past_the_end() {
        let t0 = Instant::now();
        let mut avatar = AvatarState::default();
        avatar.hold(AvatarMood::Thinking);
        assert_eq!(
            avatar.current(SessionPhase::Running, t0 + Duration::from_secs(60)),
            AvatarMood::Thinking
        );
        assert_eq!(avatar.current(SessionPhase::Completed, t0), AvatarMood::Happy);
        avatar.release();
        assert_eq!(avatar.current(SessionPhase::Running, t0), AvatarMood::Focused);
    }

    #[test]
    fn clock_formats_minutes_and_seconds() {
        assert_eq!(format_clock(25 * 60), "25:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(0), "00:00");
    }
}
