use clap::Subcommand;
use focusjuju_core::goals::fallback_breakdown;
use focusjuju_core::{Config, Database};
use tracing::warn;

use super::{message_source, print_json, runtime, CliResult};

#[derive(Subcommand)]
pub enum GoalsAction {
    /// Break a task into micro-goals
    Generate {
        /// Task to break down
        task: String,
        /// Current energy level (1-5)
        #[arg(long, default_value = "3")]
        energy: u8,
        /// Save the breakdown
        #[arg(long)]
        save: bool,
    },
    /// List saved micro-goals
    List {
        /// Include completed goals
        #[arg(long)]
        all: bool,
    },
    /// Mark a saved micro-goal as done
    Done {
        /// Goal id
        id: i64,
    },
    /// Delete a saved micro-goal
    Delete {
        /// Goal id
        id: i64,
    },
}

pub fn run(action: GoalsAction) -> CliResult {
    match action {
        GoalsAction::Generate { task, energy, save } => {
            let task = task.trim().to_string();
            if task.is_empty() {
                return Err("task must not be empty".into());
            }
            let config = Config::load()?;
            let source = message_source(&config);
            let energy = energy.clamp(1, 5);
            let goals = runtime()?.block_on(source.micro_goals(&task, energy));
            let goals = match goals {
                Ok(goals) if !goals.is_empty() => goals,
                Ok(_) => fallback_breakdown(),
                Err(e) => {
                    warn!(error = %e, "task breakdown failed, using default steps");
                    fallback_breakdown()
                }
            };
            if save {
                let mut db = Database::open()?;
                print_json(&db.save_goals(&task, &goals)?)?;
            } else {
                print_json(&goals)?;
            }
        }
        GoalsAction::List { all } => {
            let db = Database::open()?;
            print_json(&db.list_goals(all)?)?;
        }
        GoalsAction::Done { id } => {
            let db = Database::open()?;
            if !db.set_goal_completed(id, true)? {
                return Err(format!("no micro-goal with id {id}").into());
            }
            println!("ok");
        }
        GoalsAction::Delete { id } => {
            let db = Database::open()?;
            if !db.delete_goal(id)? {
                return Err(format!("no micro-goal with id {id}").into());
            }
            println!("ok");
        }
    }
    Ok(())
}
