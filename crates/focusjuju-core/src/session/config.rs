use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::companion::MessageStyle;
use crate::error::ValidationError;

/// Label reported when the user did not name the task.
pub const DEFAULT_TASK_LABEL: &str = "Focus Session";

/// Kind of focus session, as offered by the quick-start presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionKind {
    Pomodoro,
    BodyDouble,
    DeepWork,
}

impl SessionKind {
    /// Preset length in minutes, `None` when the configured duration applies.
    pub fn preset_minutes(self) -> Option<u64> {
        match self {
            SessionKind::Pomodoro => Some(25),
            SessionKind::BodyDouble => None,
            SessionKind::DeepWork => Some(90),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionKind::Pomodoro => "pomodoro",
            SessionKind::BodyDouble => "body-double",
            SessionKind::DeepWork => "deep-work",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pomodoro" => Ok(SessionKind::Pomodoro),
            "body-double" | "body_double" => Ok(SessionKind::BodyDouble),
            "deep-work" | "deep_work" => Ok(SessionKind::DeepWork),
            other => Err(ValidationError::UnknownVariant {
                kind: "session kind",
                value: other.to_string(),
            }),
        }
    }
}

/// Parameters of one focus session.
///
/// Fixed once the session leaves `Setup`. Construct through
/// [`SessionConfig::new`] or call [`SessionConfig::validate`] on a
/// hand-built value before handing it to the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub duration_secs: u64,
    pub encouragement_interval_secs: u64,
    #[serde(default)]
    pub task_label: Option<String>,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_kind")]
    pub kind: SessionKind,
    #[serde(default)]
    pub message_style: MessageStyle,
}

fn default_true() -> bool {
    true
}

fn default_kind() -> SessionKind {
    SessionKind::BodyDouble
}

impl SessionConfig {
    /// Build a validated config with default kind, style and sound.
    pub fn new(duration_secs: u64, encouragement_interval_secs: u64) -> Result<Self, ValidationError> {
        let config = Self {
            duration_secs,
            encouragement_interval_secs,
            task_label: None,
            sound_enabled: true,
            kind: default_kind(),
            message_style: MessageStyle::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_task_label(mut self, label: impl Into<String>) -> Self {
        self.task_label = Some(label.into());
        self
    }

    pub fn with_kind(mut self, kind: SessionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_message_style(mut self, style: MessageStyle) -> Self {
        self.message_style = style;
        self
    }

    pub fn with_sound(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }

    /// Check the duration and cadence constraints.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.duration_secs == 0 {
            return Err(ValidationError::ZeroDuration {
                field: "duration_secs",
            });
        }
        if self.encouragement_interval_secs == 0 {
            return Err(ValidationError::ZeroDuration {
                field: "encouragement_interval_secs",
            });
        }
        if self.encouragement_interval_secs > self.duration_secs {
            return Err(ValidationError::IntervalExceedsDuration {
                interval_secs: self.encouragement_interval_secs,
                duration_secs: self.duration_secs,
            });
        }
        Ok(())
    }

    /// Task label as reported to persistence; blank labels fall back to
    /// [`DEFAULT_TASK_LABEL`].
    pub fn display_label(&self) -> &str {
        self.task_label
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_TASK_LABEL)
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_secs.saturating_mul(1000)
    }
}
