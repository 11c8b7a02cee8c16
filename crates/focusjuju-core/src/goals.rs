//! Micro-goals: a large task broken into steps of 5 to 30 minutes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MIN_GOAL_MINUTES: u32 = 5;
pub const MAX_GOAL_MINUTES: u32 = 30;
pub const DEFAULT_GOAL_MINUTES: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(ValidationError::UnknownVariant {
                kind: "priority",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicroGoal {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub estimated_minutes: u32,
    #[serde(default)]
    pub priority: Priority,
}

impl MicroGoal {
    /// Build a goal, clamping the estimate into the micro-goal range.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        estimated_minutes: u32,
        priority: Priority,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            estimated_minutes: estimated_minutes.clamp(MIN_GOAL_MINUTES, MAX_GOAL_MINUTES),
            priority,
        }
    }
}

/// Generic three-step breakdown used when no generator is reachable.
pub fn fallback_breakdown() -> Vec<MicroGoal> {
    vec![
        MicroGoal::new(
            "Get started with a small piece",
            "Choose the easiest part of the task to begin with",
            15,
            Priority::High,
        ),
        MicroGoal::new(
            "Continue making progress",
            "Work on the next logical step of the task",
            20,
            Priority::Medium,
        ),
        MicroGoal::new(
            "Review what you've done",
            "Check your work and identify next steps",
            10,
            Priority::Low,
        ),
    ]
}

/// A micro-goal saved under its parent task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredGoal {
    pub id: i64,
    pub parent_task: String,
    #[serde(flatten)]
    pub goal: MicroGoal,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimates_are_clamped() {
        assert_eq!(MicroGoal::new("a", "", 1, Priority::Low).estimated_minutes, 5);
        assert_eq!(MicroGoal::new("a", "", 90, Priority::Low).estimated_minutes, 30);
        assert_eq!(MicroGoal::new("a", "", 20, Priority::Low).estimated_minutes, 20);
    }

    #[test]
    fn fallback_breakdown_runs_high_to_low() {
        let goals = fallback_breakdown();
        assert_eq!(goals.len(), 3);
        assert_eq!(goals[0].priority, Priority::High);
        assert_eq!(goals[2].priority, Priority::Low);
    }

    #[test]
    fn priority_parses() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
    }
}
