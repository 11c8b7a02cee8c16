use chrono::Utc;
use focusjuju_core::{Config, Database};

use super::{print_json, CliResult};

pub fn run() -> CliResult {
    let config = Config::load()?;
    let db = Database::open()?;
    let stats = db.stats(config.goals.weekly_focus_goal_min, Utc::now().date_naive())?;
    print_json(&stats)
}
