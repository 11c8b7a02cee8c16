//! SQLite-based storage for sessions, mood check-ins and micro-goals.
//!
//! Provides persistent storage for:
//! - Focus sessions, written as they start and end
//! - Mood check-ins
//! - Micro-goals saved from a task breakdown
//! - Standalone tasks
//!
//! Timestamps are stored as RFC 3339 text.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::data_dir;
use super::migrations;
use super::store::SessionStore;
use crate::error::{DatabaseError, Result};
use crate::goals::{MicroGoal, Priority, StoredGoal};
use crate::tasks::{Task, TaskDraft, TaskEdit};
use crate::mood::MoodEntry;
use crate::session::{EndStatus, SessionKind, SessionOutcome, SessionStart};
use crate::stats::{FocusStats, SessionSummary};

/// SQLite database for FocusJuju data.
pub struct Database {
    conn: Connection,
}

fn parse_time(idx: usize, value: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_optional_time(idx: usize, value: Option<String>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    value.map(|v| parse_time(idx, v)).transpose()
}

fn parse_column<T>(idx: usize, value: String) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<SessionSummary> {
    Ok(SessionSummary {
        id: row.get(0)?,
        kind: parse_column(1, row.get(1)?)?,
        task_label: row.get(2)?,
        planned_secs: row.get(3)?,
        status: row
            .get::<_, Option<String>>(4)?
            .map(|s| parse_column::<EndStatus>(4, s))
            .transpose()?,
        elapsed_secs: row.get(5)?,
        started_at: parse_time(6, row.get(6)?)?,
        ended_at: parse_optional_time(7, row.get(7)?)?,
    })
}

fn mood_from_row(row: &Row<'_>) -> rusqlite::Result<MoodEntry> {
    Ok(MoodEntry {
        mood: row.get(0)?,
        energy: row.get(1)?,
        focus: row.get(2)?,
        recorded_at: parse_time(3, row.get(3)?)?,
    })
}

fn goal_from_row(row: &Row<'_>) -> rusqlite::Result<StoredGoal> {
    Ok(StoredGoal {
        id: row.get(0)?,
        parent_task: row.get(1)?,
        goal: MicroGoal {
            title: row.get(2)?,
            description: row.get(3)?,
            estimated_minutes: row.get(4)?,
            priority: parse_column::<Priority>(5, row.get(5)?)?,
        },
        completed: row.get(6)?,
        created_at: parse_time(7, row.get(7)?)?,
        completed_at: parse_optional_time(8, row.get(8)?)?,
    })
}

const TASK_COLUMNS: &str = "id, title, description, priority, estimated_minutes, completed, \
     created_at, updated_at, completed_at";

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        draft: TaskDraft {
            title: row.get(1)?,
            description: row.get(2)?,
            priority: parse_column::<Priority>(3, row.get(3)?)?,
            estimated_minutes: row.get(4)?,
        },
        completed: row.get(5)?,
        created_at: parse_time(6, row.get(6)?)?,
        updated_at: parse_optional_time(7, row.get(7)?)?,
        completed_at: parse_optional_time(8, row.get(8)?)?,
    })
}

fn completion_time(completed: bool) -> Option<String> {
    completed.then(|| Utc::now().to_rfc3339())
}

impl Database {
    /// Open the database at `~/.config/focusjuju/focusjuju.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("focusjuju.db"))
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id           TEXT PRIMARY KEY,
                kind         TEXT NOT NULL DEFAULT 'body-double',
                task_label   TEXT NOT NULL DEFAULT 'Focus Session',
                planned_secs INTEGER NOT NULL,
                status       TEXT,
                started_at   TEXT NOT NULL,
                ended_at     TEXT,
                elapsed_secs INTEGER
            );

            CREATE TABLE IF NOT EXISTS moods (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                mood        INTEGER NOT NULL,
                energy      INTEGER NOT NULL,
                focus       INTEGER NOT NULL,
                recorded_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS micro_goals (
                id                INTEGER PRIMARY KEY AUTOINCREMENT,
                parent_task       TEXT NOT NULL,
                title             TEXT NOT NULL,
                description       TEXT NOT NULL DEFAULT '',
                estimated_minutes INTEGER NOT NULL,
                priority          TEXT NOT NULL,
                completed         INTEGER NOT NULL DEFAULT 0,
                created_at        TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_ended_at ON sessions(ended_at);
            CREATE INDEX IF NOT EXISTS idx_moods_recorded_at ON moods(recorded_at);",
        )?;
        migrations::migrate(&self.conn)
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// Stored sessions, most recently started first.
    pub fn session_summaries(&self, limit: Option<usize>) -> Result<Vec<SessionSummary>> {
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, task_label, planned_secs, status, elapsed_secs, started_at, ended_at
             FROM sessions
             ORDER BY started_at DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], session_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn stats(&self, weekly_goal_min: u32, today: NaiveDate) -> Result<FocusStats> {
        let sessions = self.session_summaries(None)?;
        Ok(FocusStats::compute(&sessions, weekly_goal_min, today))
    }

    // ── Moods ────────────────────────────────────────────────────────

    pub fn record_mood(&self, entry: &MoodEntry) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO moods (mood, energy, focus, recorded_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.mood,
                entry.energy,
                entry.focus,
                entry.recorded_at.to_rfc3339()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn latest_mood(&self) -> Result<Option<MoodEntry>> {
        let entry = self
            .conn
            .query_row(
                "SELECT mood, energy, focus, recorded_at FROM moods
                 ORDER BY recorded_at DESC, id DESC LIMIT 1",
                [],
                mood_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// Most recent check-ins first.
    pub fn mood_history(&self, limit: usize) -> Result<Vec<MoodEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT mood, energy, focus, recorded_at FROM moods
             ORDER BY recorded_at DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], mood_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    // ── Micro-goals ──────────────────────────────────────────────────

    /// Save a breakdown of `parent_task` in order.
    pub fn save_goals(&mut self, parent_task: &str, goals: &[MicroGoal]) -> Result<Vec<StoredGoal>> {
        let created_at = Utc::now();
        let tx = self.conn.transaction()?;
        let mut saved = Vec::with_capacity(goals.len());
        for goal in goals {
            tx.execute(
                "INSERT INTO micro_goals
                    (parent_task, title, description, estimated_minutes, priority, completed, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
                params![
                    parent_task,
                    goal.title,
                    goal.description,
                    goal.estimated_minutes,
                    goal.priority.as_str(),
                    created_at.to_rfc3339(),
                ],
            )?;
            saved.push(StoredGoal {
                id: tx.last_insert_rowid(),
                parent_task: parent_task.to_string(),
                goal: goal.clone(),
                completed: false,
                created_at,
                completed_at: None,
            });
        }
        tx.commit()?;
        Ok(saved)
    }

    pub fn list_goals(&self, include_completed: bool) -> Result<Vec<StoredGoal>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, parent_task, title, description, estimated_minutes, priority, completed,
                    created_at, completed_at
             FROM micro_goals
             WHERE ?1 OR completed = 0
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![include_completed], goal_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Returns false when no goal has this id.
    pub fn set_goal_completed(&self, id: i64, completed: bool) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE micro_goals SET completed = ?1, completed_at = ?2 WHERE id = ?3",
            params![completed, completion_time(completed), id],
        )?;
        Ok(changed > 0)
    }

    /// Returns false when no goal has this id.
    pub fn delete_goal(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM micro_goals WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn add_task(&self, draft: TaskDraft) -> Result<Task> {
        let draft = draft.validated()?;
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO tasks (title, description, priority, estimated_minutes, completed, created_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5)",
            params![
                draft.title,
                draft.description,
                draft.priority.as_str(),
                draft.estimated_minutes,
                created_at.to_rfc3339(),
            ],
        )?;
        Ok(Task {
            id: self.conn.last_insert_rowid(),
            draft,
            completed: false,
            created_at,
            updated_at: None,
            completed_at: None,
        })
    }

    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let task = self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                task_from_row,
            )
            .optional()?;
        Ok(task)
    }

    /// Open tasks first, then by id.
    pub fn list_tasks(&self, include_completed: bool) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE ?1 OR completed = 0
             ORDER BY completed, id"
        ))?;
        let rows = stmt.query_map(params![include_completed], task_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Apply `edit` to a task. `None` when no task has this id.
    pub fn update_task(&self, id: i64, edit: &TaskEdit) -> Result<Option<Task>> {
        let Some(task) = self.get_task(id)? else {
            return Ok(None);
        };
        let draft = edit.apply(task.draft)?;
        self.conn.execute(
            "UPDATE tasks
             SET title = ?1, description = ?2, priority = ?3, estimated_minutes = ?4, updated_at = ?5
             WHERE id = ?6",
            params![
                draft.title,
                draft.description,
                draft.priority.as_str(),
                draft.estimated_minutes,
                Utc::now().to_rfc3339(),
                id,
            ],
        )?;
        self.get_task(id)
    }

    /// Mark a task done (stamping `completed_at`) or open again (clearing
    /// it). Returns false when no task has this id.
    pub fn set_task_completed(&self, id: i64, completed: bool) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE tasks SET completed = ?1, completed_at = ?2 WHERE id = ?3",
            params![completed, completion_time(completed), id],
        )?;
        Ok(changed > 0)
    }

    /// Returns false when no task has this id.
    pub fn delete_task(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}

impl SessionStore for Database {
    fn record_session_start(&mut self, start: &SessionStart) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sessions (id, kind, task_label, planned_secs, started_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO NOTHING",
            params![
                start.session.to_string(),
                start.config.kind.as_str(),
                start.config.display_label(),
                start.config.duration_secs,
                start.started_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn record_session_end(&mut self, outcome: &SessionOutcome) -> Result<()> {
        // Used only when the start was never stored.
        let started_at = outcome.ended_at - chrono::Duration::seconds(outcome.elapsed_secs as i64);
        self.conn.execute(
            "INSERT INTO sessions
                (id, kind, task_label, planned_secs, status, started_at, ended_at, elapsed_secs)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                status = excluded.status,
                ended_at = excluded.ended_at,
                elapsed_secs = excluded.elapsed_secs",
            params![
                outcome.session.to_string(),
                outcome.kind.as_str(),
                outcome.task_label,
                outcome.duration_secs,
                outcome.status.as_str(),
                started_at.to_rfc3339(),
                outcome.ended_at.to_rfc3339(),
                outcome.elapsed_secs,
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{FocusSession, Moment, SessionConfig, SessionRef, Transition};
    use chrono::TimeZone;
    use std::time::Instant;

    fn start(session: &SessionRef, at: DateTime<Utc>) -> SessionStart {
        SessionStart {
            session: session.clone(),
            config: SessionConfig::new(1500, 300)
                .unwrap()
                .with_task_label("Write report")
                .with_kind(SessionKind::Pomodoro),
            started_at: at,
        }
    }

    fn outcome(session: &SessionRef, status: EndStatus, elapsed: u64, at: DateTime<Utc>) -> SessionOutcome {
        SessionOutcome {
            session: session.clone(),
            kind: SessionKind::Pomodoro,
            task_label: "Write report".into(),
            duration_secs: 1500,
            status,
            elapsed_secs: elapsed,
            remaining_secs: 1500 - elapsed,
            ended_at: at,
        }
    }

    #[test]
    fn session_start_then_end_updates_one_row() {
        let mut db = Database::open_memory().unwrap();
        let id = SessionRef::new();
        let t0 = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        db.record_session_start(&start(&id, t0)).unwrap();
        db.record_session_end(&outcome(&id, EndStatus::Completed, 1500, t0 + chrono::Duration::seconds(1500)))
            .unwrap();

        let sessions = db.session_summaries(None).unwrap();
        assert_eq!(sessions.len(), 1);
        let s = &sessions[0];
        assert_eq!(s.id, id.to_string());
        assert_eq!(s.kind, SessionKind::Pomodoro);
        assert_eq!(s.task_label, "Write report");
        assert_eq!(s.status, Some(EndStatus::Completed));
        assert_eq!(s.elapsed_secs, Some(1500));
        assert_eq!(s.started_at, t0);
    }

    #[test]
    fn session_end_without_start_is_upserted() {
        let mut db = Database::open_memory().unwrap();
        let id = SessionRef::new();
        let ended = Utc.with_ymd_and_hms(2026, 3, 10, 9, 10, 0).unwrap();
        db.record_session_end(&outcome(&id, EndStatus::EndedEarly, 600, ended))
            .unwrap();

        let sessions = db.session_summaries(None).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].planned_secs, 1500);
        assert_eq!(sessions[0].status, Some(EndStatus::EndedEarly));
        assert_eq!(sessions[0].started_at, ended - chrono::Duration::seconds(600));
        assert_eq!(sessions[0].task_label, "Write report");
        assert_eq!(sessions[0].kind, SessionKind::Pomodoro);
    }

    #[test]
    fn paused_session_ended_without_start_keeps_planned_length() {
        let config = SessionConfig::new(60, 10)
            .unwrap()
            .with_kind(SessionKind::DeepWork)
            .with_task_label("Read paper");
        let mut session = FocusSession::new(config).unwrap();
        let t0 = Instant::now();
        let wall = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let at = |secs: u64| {
            Moment::new(
                t0 + std::time::Duration::from_secs(secs),
                wall + chrono::Duration::seconds(secs as i64),
            )
        };
        session.start(at(0));
        session.pause(at(4));
        let Transition::EndedEarly(outcome) = session.end(at(24)) else {
            panic!("expected an early end");
        };

        let mut db = Database::open_memory().unwrap();
        db.record_session_end(&outcome).unwrap();

        let stored = &db.session_summaries(None).unwrap()[0];
        assert_eq!(stored.planned_secs, 60);
        assert_eq!(stored.elapsed_secs, Some(24));
        assert_eq!(stored.kind, SessionKind::DeepWork);
        assert_eq!(stored.task_label, "Read paper");
        assert_eq!(stored.started_at, wall);
    }

    #[test]
    fn repeated_start_keeps_first_row() {
        let mut db = Database::open_memory().unwrap();
        let id = SessionRef::new();
        let t0 = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        db.record_session_start(&start(&id, t0)).unwrap();
        db.record_session_start(&start(&id, t0 + chrono::Duration::minutes(5)))
            .unwrap();
        let sessions = db.session_summaries(None).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].started_at, t0);
    }

    #[test]
    fn stats_come_from_finished_sessions() {
        let mut db = Database::open_memory().unwrap();
        let t0 = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let a = SessionRef::new();
        db.record_session_start(&start(&a, t0)).unwrap();
        db.record_session_end(&outcome(&a, EndStatus::Completed, 1500, t0 + chrono::Duration::seconds(1500)))
            .unwrap();
        let b = SessionRef::new();
        db.record_session_start(&start(&b, t0 + chrono::Duration::hours(2)))
            .unwrap();

        let stats = db.stats(300, t0.date_naive()).unwrap();
        assert_eq!(stats.total_sessions, 1);
        assert_eq!(stats.total_focus_min, 25);
        assert_eq!(stats.current_streak_days, 1);
    }

    #[test]
    fn moods_are_returned_newest_first() {
        let db = Database::open_memory().unwrap();
        let t0 = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        db.record_mood(&MoodEntry::at(2, 2, 2, t0).unwrap()).unwrap();
        db.record_mood(&MoodEntry::at(4, 5, 3, t0 + chrono::Duration::hours(1)).unwrap())
            .unwrap();

        let latest = db.latest_mood().unwrap().unwrap();
        assert_eq!(latest.mood, 4);
        let history = db.mood_history(10).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].mood, 2);
        assert_eq!(db.mood_history(1).unwrap().len(), 1);
    }

    #[test]
    fn empty_mood_table_has_no_latest() {
        let db = Database::open_memory().unwrap();
        assert!(db.latest_mood().unwrap().is_none());
    }

    #[test]
    fn goals_can_be_completed() {
        let mut db = Database::open_memory().unwrap();
        let saved = db
            .save_goals("Write report", &crate::goals::fallback_breakdown())
            .unwrap();
        assert_eq!(saved.len(), 3);

        assert!(db.set_goal_completed(saved[0].id, true).unwrap());
        assert!(!db.set_goal_completed(9999, true).unwrap());

        let open = db.list_goals(false).unwrap();
        assert_eq!(open.len(), 2);
        let all = db.list_goals(true).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all[0].completed);
        assert!(all[0].completed_at.is_some());
        assert!(all[1].completed_at.is_none());
        assert_eq!(all[0].goal, saved[0].goal);

        assert!(db.set_goal_completed(saved[0].id, false).unwrap());
        assert!(db.list_goals(true).unwrap()[0].completed_at.is_none());

        assert!(db.delete_goal(saved[1].id).unwrap());
        assert!(!db.delete_goal(saved[1].id).unwrap());
        assert_eq!(db.list_goals(true).unwrap().len(), 2);
    }

    #[test]
    fn tasks_can_be_added_edited_completed_and_deleted() {
        let db = Database::open_memory().unwrap();
        let task = db
            .add_task(TaskDraft::new("  Call bank ").with_priority(Priority::High))
            .unwrap();
        assert_eq!(task.draft.title, "Call bank");
        assert_eq!(task.draft.estimated_minutes, 30);
        assert_eq!(db.get_task(task.id).unwrap(), Some(task.clone()));

        let edit = TaskEdit {
            description: Some("about the card".into()),
            estimated_minutes: Some(10),
            ..TaskEdit::default()
        };
        let edited = db.update_task(task.id, &edit).unwrap().unwrap();
        assert_eq!(edited.draft.description, "about the card");
        assert_eq!(edited.draft.estimated_minutes, 10);
        assert_eq!(edited.draft.priority, Priority::High);
        assert!(edited.updated_at.is_some());
        assert!(db.update_task(9999, &edit).unwrap().is_none());

        let other = db.add_task(TaskDraft::new("Water plants")).unwrap();
        assert!(db.set_task_completed(task.id, true).unwrap());
        let done = db.get_task(task.id).unwrap().unwrap();
        assert!(done.completed);
        assert!(done.completed_at.is_some());

        let open = db.list_tasks(false).unwrap();
        assert_eq!(open.iter().map(|t| t.id).collect::<Vec<_>>(), vec![other.id]);
        let all = db.list_tasks(true).unwrap();
        assert_eq!(all.iter().map(|t| t.id).collect::<Vec<_>>(), vec![other.id, task.id]);

        assert!(db.set_task_completed(task.id, false).unwrap());
        assert!(db.get_task(task.id).unwrap().unwrap().completed_at.is_none());

        assert!(db.delete_task(task.id).unwrap());
        assert!(!db.delete_task(task.id).unwrap());
        assert!(db.get_task(task.id).unwrap().is_none());
    }

    #[test]
    fn invalid_task_edits_are_refused() {
        let db = Database::open_memory().unwrap();
        assert!(matches!(
            db.add_task(TaskDraft::new("")),
            Err(crate::error::CoreError::Validation(_))
        ));

        let task = db.add_task(TaskDraft::new("Call bank")).unwrap();
        let blank = TaskEdit {
            title: Some("  ".into()),
            ..TaskEdit::default()
        };
        assert!(db.update_task(task.id, &blank).is_err());
        assert_eq!(db.get_task(task.id).unwrap().unwrap().draft.title, "Call bank");
    }
}
