//! Standalone to-do items, managed alongside micro-goal breakdowns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::goals::Priority;

pub const DEFAULT_TASK_MINUTES: u32 = 30;

/// The editable fields of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    pub estimated_minutes: u32,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            estimated_minutes: DEFAULT_TASK_MINUTES,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_estimate(mut self, minutes: u32) -> Self {
        self.estimated_minutes = minutes;
        self
    }

    /// Trim the title and reject a blank one or a zero estimate.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "title".into(),
                message: "must not be empty".into(),
            });
        }
        if self.estimated_minutes == 0 {
            return Err(ValidationError::ZeroDuration {
                field: "estimated_minutes",
            });
        }
        Ok(self)
    }
}

/// A partial update; `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub estimated_minutes: Option<u32>,
}

impl TaskEdit {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.estimated_minutes.is_none()
    }

    pub fn apply(&self, draft: TaskDraft) -> Result<TaskDraft, ValidationError> {
        TaskDraft {
            title: self.title.clone().unwrap_or(draft.title),
            description: self.description.clone().unwrap_or(draft.description),
            priority: self.priority.unwrap_or(draft.priority),
            estimated_minutes: self.estimated_minutes.unwrap_or(draft.estimated_minutes),
        }
        .validated()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    #[serde(flatten)]
    pub draft: TaskDraft,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}
