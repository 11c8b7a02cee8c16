//! Personalised advice drawn from the latest mood check-in and recent
//! sessions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::mood::MoodEntry;
use crate::stats::SessionSummary;

/// Score assumed for any mood dimension when there is no check-in yet.
pub const NEUTRAL_SCORE: u8 = 3;

/// The kind of session the advice points the user towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendedSession {
    #[default]
    BodyDouble,
    Pomodoro,
    DeepWork,
    TaskBreakdown,
}

impl RecommendedSession {
    pub const ALL: [RecommendedSession; 4] = [
        RecommendedSession::BodyDouble,
        RecommendedSession::Pomodoro,
        RecommendedSession::DeepWork,
        RecommendedSession::TaskBreakdown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecommendedSession::BodyDouble => "body-double",
            RecommendedSession::Pomodoro => "pomodoro",
            RecommendedSession::DeepWork => "deep-work",
            RecommendedSession::TaskBreakdown => "task-breakdown",
        }
    }
}

impl fmt::Display for RecommendedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecommendedSession {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecommendedSession::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownVariant {
                kind: "session recommendation",
                value: s.to_string(),
            })
    }
}

/// What an advice source gets to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceContext {
    pub mood: u8,
    pub energy: u8,
    pub focus: u8,
    pub total_sessions: u64,
    pub total_focus_min: u64,
    pub average_session_min: u64,
}

impl AdviceContext {
    /// Summarise finished sessions and the latest check-in. Without a
    /// check-in every score is [`NEUTRAL_SCORE`].
    pub fn from_history(latest: Option<&MoodEntry>, sessions: &[SessionSummary]) -> Self {
        let (mood, energy, focus) = latest
            .map(|m| (m.mood, m.energy, m.focus))
            .unwrap_or((NEUTRAL_SCORE, NEUTRAL_SCORE, NEUTRAL_SCORE));

        let finished: Vec<u64> = sessions
            .iter()
            .filter(|s| s.is_finished())
            .map(|s| s.elapsed_secs.unwrap_or(0))
            .collect();
        let total_sessions = finished.len() as u64;
        let total_secs: u64 = finished.iter().sum();
        let average_session_min = if total_sessions == 0 {
            0
        } else {
            round_minutes(total_secs / total_sessions)
        };

        Self {
            mood,
            energy,
            focus,
            total_sessions,
            total_focus_min: round_minutes(total_secs),
            average_session_min,
        }
    }
}

fn round_minutes(secs: u64) -> u64 {
    (secs + 30) / 60
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advice {
    pub summary: String,
    pub primary_advice: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_advice: Option<String>,
    pub encouragement: String,
    #[serde(default)]
    pub recommended_session_type: RecommendedSession,
}

/// Advice given when no generator is reachable.
pub fn fallback_advice() -> Advice {
    Advice {
        summary: "You seem to be making steady progress with your focus sessions.".into(),
        primary_advice: "Consider taking short breaks between focus sessions to maintain energy."
            .into(),
        secondary_advice: Some(
            "Try breaking down larger tasks into smaller steps for better progress.".into(),
        ),
        encouragement:
            "You're doing great! Each focus session is building your productivity muscle.".into(),
        recommended_session_type: RecommendedSession::BodyDouble,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{EndStatus, SessionKind};
    use chrono::{TimeZone, Utc};

    fn summary(elapsed: Option<u64>, status: Option<EndStatus>) -> SessionSummary {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        SessionSummary {
            id: uuid::Uuid::new_v4().to_string(),
            kind: SessionKind::Pomodoro,
            task_label: "Focus Session".into(),
            planned_secs: 1500,
            status,
            elapsed_secs: elapsed,
            started_at: t0,
            ended_at: status.map(|_| t0 + chrono::Duration::seconds(elapsed.unwrap_or(0) as i64)),
        }
    }

    #[test]
    fn context_without_history_is_neutral() {
        let ctx = AdviceContext::from_history(None, &[]);
        assert_eq!((ctx.mood, ctx.energy, ctx.focus), (3, 3, 3));
        assert_eq!(ctx.total_sessions, 0);
        assert_eq!(ctx.average_session_min, 0);
    }

    #[test]
    fn context_counts_only_finished_sessions() {
        let mood = MoodEntry::new(2, 4, 1).unwrap();
        let sessions = [
            summary(Some(1500), Some(EndStatus::Completed)),
            summary(Some(600), Some(EndStatus::EndedEarly)),
            summary(None, None),
        ];
        let ctx = AdviceContext::from_history(Some(&mood), &sessions);
        assert_eq!((ctx.mood, ctx.energy, ctx.focus), (2, 4, 1));
        assert_eq!(ctx.total_sessions, 2);
        assert_eq!(ctx.total_focus_min, 35);
        assert_eq!(ctx.average_session_min, 18);
    }

    #[test]
    fn recommendation_parses_names() {
        assert_eq!(
            "Task-Breakdown".parse::<RecommendedSession>().unwrap(),
            RecommendedSession::TaskBreakdown
        );
        assert!("nap".parse::<RecommendedSession>().is_err());
    }

    #[test]
    fn advice_serialises_in_camel_case() {
        let json = serde_json::to_value(fallback_advice()).unwrap();
        assert_eq!(json["recommendedSessionType"], "body-double");
        assert!(json["primaryAdvice"].is_string());
    }
}
