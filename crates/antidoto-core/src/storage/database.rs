//! SQLite-based storage for diary entries, meditation sessions, the
//! sign-in allow-list and small persisted state.
//!
//! The row store is the external collaborator of the UI layer: the CLI
//! fetches a user's entries wholesale and writes single upserts keyed on
//! (user, date).

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{data_dir, migrations};
use crate::auth::User;
use crate::error::{CoreError, DatabaseError};
use crate::journal::DayEntry;

/// One completed meditation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeditationRecord {
    pub id: i64,
    pub duration_min: u64,
    pub date: NaiveDate,
    pub completed_at: DateTime<Utc>,
}

/// Parse a stored `YYYY-MM-DD` column value.
fn parse_date(idx: usize, value: String) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a stored RFC 3339 timestamp column value.
fn parse_timestamp(idx: usize, value: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<DayEntry> {
    let date: String = row.get(0)?;
    Ok(DayEntry {
        date: parse_date(0, date)?,
        work_good: row.get(1)?,
        day_good: row.get(2)?,
        sleep_good: row.get(3)?,
        tasks_done: row.get(4)?,
        notes: row.get(5)?,
    })
}

/// SQLite database for all persistent state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/antidoto/antidoto.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()
            .map_err(|e| CoreError::Custom(e.to_string()))?
            .join("antidoto.db");
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        // Concurrent invocations (two terminals, parallel tests) wait
        // instead of failing with SQLITE_BUSY.
        conn.busy_timeout(std::time::Duration::from_secs(5))
            .map_err(DatabaseError::from)?;
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // ── Diary entries ────────────────────────────────────────────────

    /// Insert or fully replace the entry for (user, date).
    ///
    /// Last write wins; there is no merge and no concurrency check.
    pub fn upsert_entry(&self, user_id: &str, entry: &DayEntry) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO diary_entries
                 (user_id, date, work_good, day_good, sleep_good, tasks_done, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(user_id, date) DO UPDATE SET
                 work_good = excluded.work_good,
                 day_good = excluded.day_good,
                 sleep_good = excluded.sleep_good,
                 tasks_done = excluded.tasks_done,
                 notes = excluded.notes",
            params![
                user_id,
                entry.date.format("%Y-%m-%d").to_string(),
                entry.work_good,
                entry.day_good,
                entry.sleep_good,
                entry.tasks_done,
                entry.notes,
            ],
        )?;
        Ok(())
    }

    /// Fetch all entries for a user, ascending by date. No pagination --
    /// the dashboard reads the collection wholesale.
    pub fn list_entries(&self, user_id: &str) -> Result<Vec<DayEntry>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT date, work_good, day_good, sleep_good, tasks_done, notes
             FROM diary_entries WHERE user_id = ?1 ORDER BY date",
        )?;
        let rows = stmt.query_map(params![user_id], row_to_entry)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Fetch the single entry for (user, date), if present.
    pub fn get_entry(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DayEntry>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT date, work_good, day_good, sleep_good, tasks_done, notes
             FROM diary_entries WHERE user_id = ?1 AND date = ?2",
        )?;
        Ok(stmt
            .query_row(
                params![user_id, date.format("%Y-%m-%d").to_string()],
                row_to_entry,
            )
            .optional()?)
    }

    // ── Meditation sessions ──────────────────────────────────────────

    /// Append one completed meditation session.
    pub fn record_meditation(
        &self,
        user_id: &str,
        duration_min: u64,
        date: NaiveDate,
        completed_at: DateTime<Utc>,
    ) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO meditation_sessions (user_id, duration_min, date, completed_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                user_id,
                duration_min,
                date.format("%Y-%m-%d").to_string(),
                completed_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Fetch all meditation sessions for a user.
    pub fn list_meditations(&self, user_id: &str) -> Result<Vec<MeditationRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, duration_min, date, completed_at
             FROM meditation_sessions WHERE user_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            let date: String = row.get(2)?;
            let completed_at: String = row.get(3)?;
            Ok(MeditationRecord {
                id: row.get(0)?,
                duration_min: row.get(1)?,
                date: parse_date(2, date)?,
                completed_at: parse_timestamp(3, completed_at)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    // ── Allow-list ───────────────────────────────────────────────────

    pub fn allow_email(&self, email: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO allowed_emails (email) VALUES (?1)",
            params![email],
        )?;
        Ok(())
    }

    /// Remove an email from the allow-list. Returns whether it was there.
    pub fn revoke_email(&self, email: &str) -> Result<bool, DatabaseError> {
        let changed = self
            .conn
            .execute("DELETE FROM allowed_emails WHERE email = ?1", params![email])?;
        Ok(changed > 0)
    }

    pub fn is_email_allowed(&self, email: &str) -> Result<bool, DatabaseError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM allowed_emails WHERE email = ?1",
            params![email],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn list_allowed_emails(&self) -> Result<Vec<String>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT email FROM allowed_emails ORDER BY email")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    // ── Users ────────────────────────────────────────────────────────

    pub fn find_user(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, email FROM users WHERE email = ?1")?;
        Ok(stmt
            .query_row(params![email], |row| {
                Ok(User {
                    id: row.get(0)?,
                    email: row.get(1)?,
                })
            })
            .optional()?)
    }

    /// Look up the user for `email`, creating one with a generated id on
    /// first sign-in. The id is stable across sessions.
    pub fn find_or_create_user(&self, email: &str) -> Result<User, DatabaseError> {
        if let Some(user) = self.find_user(email)? {
            return Ok(user);
        }
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
        };
        self.conn.execute(
            "INSERT INTO users (id, email, created_at) VALUES (?1, ?2, ?3)",
            params![user.id, user.email, Utc::now().to_rfc3339()],
        )?;
        Ok(user)
    }

    // ── Key-value store ──────────────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        Ok(stmt
            .query_row(params![key], |row| row.get::<_, String>(0))
            .optional()?)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Delete a key from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}
