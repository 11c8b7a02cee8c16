//! Mood check-ins on a 1..=5 scale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const MOOD_LABELS: [&str; 5] = ["Struggling", "Challenged", "Neutral", "Good", "Great"];
const ENERGY_LABELS: [&str; 5] = ["Exhausted", "Low Energy", "Moderate", "Energetic", "High Energy"];
const FOCUS_LABELS: [&str; 5] = [
    "Very Distracted",
    "Somewhat Distracted",
    "Neutral",
    "Focused",
    "Deeply Focused",
];

/// One check-in. All three scores are on a 1..=5 scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub mood: u8,
    pub energy: u8,
    pub focus: u8,
    pub recorded_at: DateTime<Utc>,
}

fn check(field: &'static str, value: u8) -> Result<u8, ValidationError> {
    if (1..=5).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfScale { field, value })
    }
}

fn label(labels: &[&'static str; 5], value: u8) -> &'static str {
    labels[usize::from(value.clamp(1, 5)) - 1]
}

impl MoodEntry {
    pub fn new(mood: u8, energy: u8, focus: u8) -> Result<Self, ValidationError> {
        Self::at(mood, energy, focus, Utc::now())
    }

    pub fn at(
        mood: u8,
        energy: u8,
        focus: u8,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            mood: check("mood", mood)?,
            energy: check("energy", energy)?,
            focus: check("focus", focus)?,
            recorded_at,
        })
    }

    pub fn mood_label(&self) -> &'static str {
        label(&MOOD_LABELS, self.mood)
    }

    pub fn energy_label(&self) -> &'static str {
        label(&ENERGY_LABELS, self.energy)
    }

    pub fn focus_label(&self) -> &'static str {
        label(&FOCUS_LABELS, self.focus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_outside_scale_are_rejected() {
        assert_eq!(
            MoodEntry::new(0, 3, 3).unwrap_err(),
            ValidationError::OutOfScale { field: "mood", value: 0 }
        );
        assert_eq!(
            MoodEntry::new(3, 6, 3).unwrap_err(),
            ValidationError::OutOfScale { field: "energy", value: 6 }
        );
        assert!(MoodEntry::new(1, 5, 3).is_ok());
    }

    #[test]
    fn labels_follow_scores() {
        let entry = MoodEntry::new(1, 5, 4).unwrap();
        assert_eq!(entry.mood_label(), "Struggling");
        assert_eq!(entry.energy_label(), "High Energy");
        assert_eq!(entry.focus_label(), "Focused");
    }
}
