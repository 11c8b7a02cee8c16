//! Versioned schema changes.
//!
//! The baseline tables are created by `Database::migrate`; everything after
//! that is applied here in order and recorded in `schema_version`.

use rusqlite::{Connection, OptionalExtension, Result as SqliteResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )?;

    let current = schema_version(conn)?;
    if current < 1 {
        migrate_v1(conn)?;
    }
    if current < 2 {
        migrate_v2(conn)?;
    }
    Ok(())
}

/// 0 for a database that predates version tracking.
pub fn schema_version(conn: &Connection) -> SqliteResult<i32> {
    let version = conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .optional()?;
    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// v1: baseline sessions, moods and micro-goals.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    set_schema_version(conn, 1)
}

/// v2: completion time on micro-goals, standalone tasks.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "ALTER TABLE micro_goals ADD COLUMN completed_at TEXT;

        CREATE TABLE IF NOT EXISTS tasks (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            title             TEXT NOT NULL,
            description       TEXT NOT NULL DEFAULT '',
            priority          TEXT NOT NULL DEFAULT 'medium',
            estimated_minutes INTEGER NOT NULL,
            completed         INTEGER NOT NULL DEFAULT 0,
            created_at        TEXT NOT NULL,
            updated_at        TEXT,
            completed_at      TEXT
        );",
    )?;
    set_schema_version(&tx, 2)?;
    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASELINE: &str = "CREATE TABLE micro_goals (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        parent_task       TEXT NOT NULL,
        title             TEXT NOT NULL,
        description       TEXT NOT NULL DEFAULT '',
        estimated_minutes INTEGER NOT NULL,
        priority          TEXT NOT NULL,
        completed         INTEGER NOT NULL DEFAULT 0,
        created_at        TEXT NOT NULL
    );";

    #[test]
    fn upgrades_an_untracked_database() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(BASELINE).unwrap();
        conn.execute(
            "INSERT INTO micro_goals (parent_task, title, estimated_minutes, priority, completed, created_at)
             VALUES ('Plan', 'Outline', 15, 'high', 1, '2026-03-10T09:00:00+00:00')",
            [],
        )
        .unwrap();

        migrate(&conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);

        let completed_at: Option<String> = conn
            .query_row("SELECT completed_at FROM micro_goals", [], |row| row.get(0))
            .unwrap();
        assert_eq!(completed_at, None);
        let tasks: i64 = conn
            .query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))
            .unwrap();
        assert_eq!(tasks, 0);
    }

    #[test]
    fn migrating_twice_is_a_no_op() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(BASELINE).unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }
}
