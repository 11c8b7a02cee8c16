use clap::Subcommand;
use focusjuju_core::{Database, Priority, TaskDraft, TaskEdit};

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum TasksAction {
    /// Add a task
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// high, medium or low
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Estimated minutes
        #[arg(long, default_value = "30")]
        minutes: u32,
    },
    /// List tasks, open ones first
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
    },
    /// Change a task's fields
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Mark a task as done
    Done { id: i64 },
    /// Mark a done task as open again
    Reopen { id: i64 },
    /// Delete a task
    Delete { id: i64 },
}

fn missing(id: i64) -> Box<dyn std::error::Error> {
    format!("no task with id {id}").into()
}

fn set_completed(db: &Database, id: i64, completed: bool) -> CliResult {
    if !db.set_task_completed(id, completed)? {
        return Err(missing(id));
    }
    println!("ok");
    Ok(())
}

pub fn run(action: TasksAction) -> CliResult {
    let db = Database::open()?;
    match action {
        TasksAction::Add {
            title,
            description,
            priority,
            minutes,
        } => {
            let draft = TaskDraft::new(title)
                .with_description(description)
                .with_priority(priority)
                .with_estimate(minutes);
            print_json(&db.add_task(draft)?)?;
        }
        TasksAction::List { all } => print_json(&db.list_tasks(all)?)?,
        TasksAction::Edit {
            id,
            title,
            description,
            priority,
            minutes,
        } => {
            let edit = TaskEdit {
                title,
                description,
                priority,
                estimated_minutes: minutes,
            };
            if edit.is_empty() {
                return Err("nothing to change".into());
            }
            let task = db.update_task(id, &edit)?.ok_or_else(|| missing(id))?;
            print_json(&task)?;
        }
        TasksAction::Done { id } => set_completed(&db, id, true)?,
        TasksAction::Reopen { id } => set_completed(&db, id, false)?,
        TasksAction::Delete { id } => {
            if !db.delete_task(id)? {
                return Err(missing(id));
            }
            println!("ok");
        }
    }
    Ok(())
}
