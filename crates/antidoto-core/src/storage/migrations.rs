//! Database schema migrations for antidoto.
//!
//! Migrations are versioned and applied automatically when opening the
//! database. The `schema_version` table tracks the current version.
//!
//! The source data went through two incompatible shapes: a legacy
//! `daily_checklist` table with a nested JSON `content` column linked by
//! email, and the normalized flat-column layout. v1 is the legacy
//! baseline; v2 normalizes everything to flat columns with rows linked by
//! a generated user id.

use rusqlite::{params, Connection, Result as SqliteResult};
use uuid::Uuid;

/// Apply all pending migrations to bring the database to the current
/// schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or(0)
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: legacy baseline.
///
/// The first revision of the app stored the checklist as a JSON blob in
/// `daily_checklist.content` and linked every row by raw email. The kv
/// table (session token, persisted timers) existed from the start.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS daily_checklist (
            user_email TEXT NOT NULL,
            date       TEXT NOT NULL,
            content    TEXT NOT NULL DEFAULT '{}',
            UNIQUE(user_email, date)
        );

        CREATE TABLE IF NOT EXISTS meditation_log (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            user_email TEXT NOT NULL,
            duration   INTEGER NOT NULL,
            date       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS kv (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )?;
    set_schema_version(conn, 1)?;
    Ok(())
}

/// Migration v2: normalized schema.
///
/// - `users`: one row per distinct email, id is a generated UUID.
/// - `diary_entries`: flat boolean columns, linked by user id,
///   UNIQUE(user_id, date) backing the upsert.
/// - `meditation_sessions`: append-only, linked by user id.
/// - `allowed_emails`: the sign-in allow-list.
///
/// Legacy rows are carried over (content JSON flattened, emails resolved
/// to generated ids) and the legacy tables dropped.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE users (
            id         TEXT PRIMARY KEY,
            email      TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        );

        CREATE TABLE allowed_emails (
            email TEXT PRIMARY KEY
        );

        CREATE TABLE diary_entries (
            user_id    TEXT NOT NULL,
            date       TEXT NOT NULL,
            work_good  INTEGER NOT NULL DEFAULT 0,
            day_good   INTEGER NOT NULL DEFAULT 0,
            sleep_good INTEGER NOT NULL DEFAULT 0,
            tasks_done INTEGER NOT NULL DEFAULT 0,
            notes      TEXT NOT NULL DEFAULT '',
            UNIQUE(user_id, date)
        );

        CREATE TABLE meditation_sessions (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id      TEXT NOT NULL,
            duration_min INTEGER NOT NULL,
            date         TEXT NOT NULL,
            completed_at TEXT NOT NULL
        );

        CREATE INDEX idx_diary_entries_user ON diary_entries(user_id);
        CREATE INDEX idx_meditation_sessions_user ON meditation_sessions(user_id);",
    )?;

    // Resolve every legacy email to a generated user id.
    let emails: Vec<String> = {
        let mut stmt = tx.prepare(
            "SELECT user_email FROM daily_checklist
             UNION SELECT user_email FROM meditation_log",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect::<SqliteResult<Vec<_>>>()?
    };
    let now = chrono::Utc::now().to_rfc3339();
    for email in &emails {
        tx.execute(
            "INSERT OR IGNORE INTO users (id, email, created_at) VALUES (?1, ?2, ?3)",
            params![Uuid::new_v4().to_string(), email, now],
        )?;
    }

    // Flatten daily_checklist.content into diary_entries columns.
    {
        let mut stmt =
            tx.prepare("SELECT user_email, date, content FROM daily_checklist")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        for row in rows {
            let (email, date, content) = row?;
            let parsed: serde_json::Value =
                serde_json::from_str(&content).unwrap_or(serde_json::Value::Null);
            let flag = |key: &str| parsed.get(key).and_then(|v| v.as_bool()).unwrap_or(false);
            let notes = parsed
                .get("notes")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            tx.execute(
                "INSERT OR IGNORE INTO diary_entries
                     (user_id, date, work_good, day_good, sleep_good, tasks_done, notes)
                 SELECT id, ?2, ?3, ?4, ?5, ?6, ?7 FROM users WHERE email = ?1",
                params![
                    email,
                    date,
                    flag("work_good"),
                    flag("day_good"),
                    flag("sleep_good"),
                    flag("tasks_done"),
                    notes,
                ],
            )?;
        }
    }

    // Carry over meditation history.
    tx.execute(
        "INSERT INTO meditation_sessions (user_id, duration_min, date, completed_at)
         SELECT u.id, m.duration, m.date, m.date || 'T00:00:00+00:00'
         FROM meditation_log m JOIN users u ON u.email = m.user_email",
        [],
    )?;

    tx.execute_batch("DROP TABLE daily_checklist; DROP TABLE meditation_log;")?;

    tx.execute("DELETE FROM schema_version", [])?;
    tx.execute("INSERT INTO schema_version (version) VALUES (?1)", [2])?;

    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test migration from scratch (v0 -> v2).
    #[test]
    fn test_migrate_from_scratch() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        assert_eq!(get_schema_version(&conn), 2);

        // Normalized tables exist and legacy ones are gone.
        conn.prepare("SELECT user_id, date, work_good, notes FROM diary_entries")
            .unwrap();
        conn.prepare("SELECT id, email FROM users").unwrap();
        conn.prepare("SELECT email FROM allowed_emails").unwrap();
        assert!(conn.prepare("SELECT * FROM daily_checklist").is_err());
    }

    /// Test that legacy nested-content rows are flattened and relinked.
    #[test]
    fn test_migrate_legacy_data() {
        let conn = Connection::open_in_memory().unwrap();

        // Build a v1 database by hand.
        create_schema_version_table(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        conn.execute(
            "INSERT INTO daily_checklist (user_email, date, content)
             VALUES ('ana@example.com', '2026-03-05',
                     '{\"work_good\":true,\"day_good\":false,\"notes\":\"bom dia\"}')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO meditation_log (user_email, duration, date)
             VALUES ('ana@example.com', 10, '2026-03-05')",
            [],
        )
        .unwrap();

        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 2);

        // One user, linked by a generated id rather than the email.
        let (user_id, email): (String, String) = conn
            .query_row("SELECT id, email FROM users", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(email, "ana@example.com");
        assert!(Uuid::parse_str(&user_id).is_ok());

        let (linked, work_good, notes): (String, bool, String) = conn
            .query_row(
                "SELECT user_id, work_good, notes FROM diary_entries WHERE date = '2026-03-05'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(linked, user_id);
        assert!(work_good);
        assert_eq!(notes, "bom dia");

        let duration: i64 = conn
            .query_row(
                "SELECT duration_min FROM meditation_sessions WHERE user_id = ?1",
                [&user_id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(duration, 10);
    }

    /// Test that migrations are idempotent.
    #[test]
    fn test_migrate_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 2);
    }

    /// Test that the schema version survives reopening the file.
    #[test]
    fn test_version_persists_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("antidoto.db");

        {
            let conn = Connection::open(&path).unwrap();
            migrate(&conn).unwrap();
        }

        let conn = Connection::open(&path).unwrap();
        assert_eq!(get_schema_version(&conn), 2);
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 2);
    }

    /// Test that unparsable legacy content degrades to an all-false row.
    #[test]
    fn test_migrate_corrupt_content() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        conn.execute(
            "INSERT INTO daily_checklist (user_email, date, content)
             VALUES ('bob@example.com', '2026-01-02', 'not json')",
            [],
        )
        .unwrap();

        migrate(&conn).unwrap();

        let (work_good, notes): (bool, String) = conn
            .query_row(
                "SELECT work_good, notes FROM diary_entries WHERE date = '2026-01-02'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert!(!work_good);
        assert_eq!(notes, "");
    }
}
