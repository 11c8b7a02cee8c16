use clap::Subcommand;
use focusjuju_core::{Database, MoodEntry};
use serde_json::json;

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum MoodAction {
    /// Record a check-in (each score 1-5)
    Log {
        #[arg(long)]
        mood: u8,
        #[arg(long)]
        energy: u8,
        #[arg(long)]
        focus: u8,
    },
    /// Show the latest check-in
    Latest,
    /// Show recent check-ins, newest first
    History {
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

fn labelled(entry: &MoodEntry) -> serde_json::Value {
    json!({
        "mood": entry.mood,
        "mood_label": entry.mood_label(),
        "energy": entry.energy,
        "energy_label": entry.energy_label(),
        "focus": entry.focus,
        "focus_label": entry.focus_label(),
        "recorded_at": entry.recorded_at,
    })
}

pub fn run(action: MoodAction) -> CliResult {
    let db = Database::open()?;
    match action {
        MoodAction::Log { mood, energy, focus } => {
            let entry = MoodEntry::new(mood, energy, focus)?;
            db.record_mood(&entry)?;
            print_json(&labelled(&entry))?;
        }
        MoodAction::Latest => match db.latest_mood()? {
            Some(entry) => print_json(&labelled(&entry))?,
            None => println!("no mood check-ins yet"),
        },
        MoodAction::History { limit } => {
            let entries: Vec<_> = db.mood_history(limit)?.iter().map(labelled).collect();
            print_json(&entries)?;
        }
    }
    Ok(())
}
