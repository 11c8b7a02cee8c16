//! Progress statistics over stored sessions.
//!
//! Only finished sessions count. Days are calendar days in UTC, keyed on
//! the time a session ended.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{EndStatus, SessionKind};

/// A stored session as read back from the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub kind: SessionKind,
    pub task_label: String,
    pub planned_secs: u64,
    /// `None` while the session has not ended.
    pub status: Option<EndStatus>,
    pub elapsed_secs: Option<u64>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl SessionSummary {
    pub fn is_finished(&self) -> bool {
        self.status.is_some() && self.ended_at.is_some()
    }
}

/// Focus minutes on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyFocus {
    pub date: NaiveDate,
    pub focus_min: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FocusStats {
    pub total_sessions: u64,
    pub completed_sessions: u64,
    pub ended_early_sessions: u64,
    pub total_focus_min: u64,
    /// Consecutive days with at least one finished session, counting back
    /// from today or yesterday.
    pub current_streak_days: u32,
    pub weekly_focus_min: u64,
    pub weekly_goal_min: u32,
    /// Share of the weekly goal reached, capped at 100.
    pub weekly_progress_pct: u8,
    /// Last seven days, oldest first.
    pub daily_focus: Vec<DailyFocus>,
}

fn secs_to_min(secs: u64) -> u64 {
    (secs + 30) / 60
}

impl FocusStats {
    pub fn compute(sessions: &[SessionSummary], weekly_goal_min: u32, today: NaiveDate) -> Self {
        let finished: Vec<(NaiveDate, EndStatus, u64)> = sessions
            .iter()
            .filter_map(|s| {
                Some((
                    s.ended_at?.date_naive(),
                    s.status?,
                    s.elapsed_secs.unwrap_or(0),
                ))
            })
            .collect();

        let week_start = today - Duration::days(6);
        let focus_secs_on = |day: NaiveDate| -> u64 {
            finished
                .iter()
                .filter(|(d, _, _)| *d == day)
                .map(|(_, _, secs)| secs)
                .sum()
        };
        let daily_focus: Vec<DailyFocus> = (0..7)
            .map(|offset| {
                let date = week_start + Duration::days(offset);
                DailyFocus {
                    date,
                    focus_min: secs_to_min(focus_secs_on(date)),
                }
            })
            .collect();

        let weekly_secs: u64 = finished
            .iter()
            .filter(|(d, _, _)| *d >= week_start && *d <= today)
            .map(|(_, _, secs)| secs)
            .sum();
        let weekly_focus_min = secs_to_min(weekly_secs);

        Self {
            total_sessions: finished.len() as u64,
            completed_sessions: finished
                .iter()
                .filter(|(_, status, _)| *status == EndStatus::Completed)
                .count() as u64,
            ended_early_sessions: finished
                .iter()
                .filter(|(_, status, _)| *status == EndStatus::EndedEarly)
                .count() as u64,
            total_focus_min: secs_to_min(finished.iter().map(|(_, _, secs)| secs).sum()),
            current_streak_days: current_streak(finished.iter().map(|(d, _, _)| *d), today),
            weekly_focus_min,
            weekly_goal_min,
            weekly_progress_pct: weekly_progress(weekly_focus_min, weekly_goal_min),
            daily_focus,
        }
    }
}

/// Length of the run of consecutive days ending today or yesterday.
pub fn current_streak(days: impl IntoIterator<Item = NaiveDate>, today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = days.into_iter().filter(|d| *d <= today).collect();
    let Some(&latest) = days.iter().next_back() else {
        return 0;
    };
    if latest < today - Duration::days(1) {
        return 0;
    }

    let mut streak = 0;
    let mut expected = latest;
    for day in days.iter().rev() {
        if *day != expected {
            break;
        }
        streak += 1;
        expected = expected - Duration::days(1);
    }
    streak
}

/// Percentage of `goal_min` reached, capped at 100. A zero goal counts as met.
pub fn weekly_progress(focus_min: u64, goal_min: u32) -> u8 {
    if goal_min == 0 {
        return 100;
    }
    (focus_min.saturating_mul(100) / u64::from(goal_min)).min(100) as u8
}
