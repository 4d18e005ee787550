// SQLite persistence layer: the draft action log and key-value draft state.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use tracing::warn;

use crate::draft::action::Action;

/// SQLite-backed persistence for the accepted-action log and key-value
/// draft state.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS draft_actions (
                seq       INTEGER PRIMARY KEY AUTOINCREMENT,
                draft_id  TEXT NOT NULL,
                action    TEXT NOT NULL,
                timestamp TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE INDEX IF NOT EXISTS idx_draft_actions_draft_id ON draft_actions(draft_id);

            CREATE TABLE IF NOT EXISTS draft_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection. A poisoned lock still guards a
    /// usable connection, so the guard is recovered rather than panicking.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ------------------------------------------------------------------
    // Action log
    // ------------------------------------------------------------------

    /// Append an accepted action to the log for `draft_id`. Returns the
    /// sequence number assigned by SQLite.
    pub fn append_action(&self, draft_id: &str, action: &Action) -> Result<i64> {
        let conn = self.conn();
        let json = serde_json::to_string(action).context("failed to serialize action")?;
        conn.execute(
            "INSERT INTO draft_actions (draft_id, action) VALUES (?1, ?2)",
            params![draft_id, json],
        )
        .context("failed to append draft action")?;
        Ok(conn.last_insert_rowid())
    }

    /// Load the action log for a draft session, oldest first.
    ///
    /// Rows that no longer deserialize (e.g. written by an incompatible
    /// build) are skipped with a warning.
    pub fn load_actions(&self, draft_id: &str) -> Result<Vec<Action>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT seq, action FROM draft_actions WHERE draft_id = ?1 ORDER BY seq")
            .context("failed to prepare load_actions query")?;

        let rows = stmt
            .query_map(params![draft_id], |row| {
                let seq: i64 = row.get(0)?;
                let json: String = row.get(1)?;
                Ok((seq, json))
            })
            .context("failed to query draft actions")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map draft action rows")?;

        let mut actions = Vec::with_capacity(rows.len());
        for (seq, json) in rows {
            match serde_json::from_str::<Action>(&json) {
                Ok(action) => actions.push(action),
                Err(e) => warn!("skipping unreadable action #{}: {}", seq, e),
            }
        }
        Ok(actions)
    }

    /// Returns `true` if at least one action has been logged for `draft_id`.
    pub fn has_draft_in_progress(&self, draft_id: &str) -> Result<bool> {
        let conn = self.conn();
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM draft_actions WHERE draft_id = ?1)",
                params![draft_id],
                |row| row.get(0),
            )
            .context("failed to check draft_actions existence")?;
        Ok(exists)
    }

    /// Number of actions logged for `draft_id`.
    pub fn action_count(&self, draft_id: &str) -> Result<usize> {
        let conn = self.conn();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM draft_actions WHERE draft_id = ?1",
                params![draft_id],
                |row| row.get(0),
            )
            .context("failed to count draft actions")?;
        Ok(count as usize)
    }

    // ------------------------------------------------------------------
    // Key-value state
    // ------------------------------------------------------------------

    /// Persist an arbitrary JSON value under `key`. Uses INSERT OR REPLACE so
    /// repeated saves overwrite the previous value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str =
            serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO draft_state (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load a previously saved JSON value by `key`. Returns `None` if the key
    /// does not exist.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT value FROM draft_state WHERE key = ?1")
            .context("failed to prepare load_state query")?;

        let mut rows = stmt
            .query_map(params![key], |row| {
                let json_str: String = row.get(0)?;
                Ok(json_str)
            })
            .context("failed to query draft state")?;

        match rows.next() {
            Some(row_result) => {
                let json_str = row_result.context("failed to read state row")?;
                let value: serde_json::Value = serde_json::from_str(&json_str)
                    .context("failed to deserialize state value")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Delete the whole action log and all draft state. Uses a transaction
    /// with automatic rollback on error.
    pub fn clear_draft(&self) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        tx.execute("DELETE FROM draft_actions", [])
            .context("failed to delete draft actions")?;
        tx.execute("DELETE FROM draft_state", [])
            .context("failed to delete draft state")?;
        tx.commit().context("failed to commit clear_draft")?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Draft ID management
    // ------------------------------------------------------------------

    /// Key used in the draft_state table to store the current draft ID.
    const DRAFT_ID_KEY: &'static str = "current_draft_id";

    /// Retrieve the stored draft ID. Returns `None` if none has been set.
    pub fn get_draft_id(&self) -> Result<Option<String>> {
        let value = self.load_state(Self::DRAFT_ID_KEY)?;
        Ok(value.and_then(|v| v.as_str().map(|s| s.to_string())))
    }

    /// Persist a draft ID to the key-value store.
    pub fn set_draft_id(&self, draft_id: &str) -> Result<()> {
        self.save_state(
            Self::DRAFT_ID_KEY,
            &serde_json::Value::String(draft_id.to_string()),
        )
    }

    /// Generate a new draft ID from the current UTC timestamp.
    ///
    /// Format: `draft_YYYYMMDD_HHMMSS_SSS` (e.g. `draft_20260228_143022_123`).
    pub fn generate_draft_id() -> String {
        let now = chrono::Utc::now();
        now.format("draft_%Y%m%d_%H%M%S_%3f").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TEST_DRAFT_ID: &str = "test_draft_001";

    /// Helper: create a fresh in-memory database for each test.
    fn test_db() -> Database {
        Database::open(":memory:").expect("in-memory database should open")
    }

    #[test]
    fn open_creates_tables() {
        let db = test_db();
        let conn = db.conn();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"draft_actions".to_string()));
        assert!(tables.contains(&"draft_state".to_string()));
    }

    #[test]
    fn append_and_load_actions_in_order() {
        let db = test_db();
        let first = db.append_action(TEST_DRAFT_ID, &Action::pick("Josh Allen")).unwrap();
        let second = db.append_action(TEST_DRAFT_ID, &Action::UndoPickPlayer).unwrap();
        db.append_action(TEST_DRAFT_ID, &Action::SetTrackedTeam { tracked_team: 2 })
            .unwrap();
        assert!(second > first);

        let actions = db.load_actions(TEST_DRAFT_ID).unwrap();
        assert_eq!(
            actions,
            vec![
                Action::pick("Josh Allen"),
                Action::UndoPickPlayer,
                Action::SetTrackedTeam { tracked_team: 2 },
            ]
        );
        assert_eq!(db.action_count(TEST_DRAFT_ID).unwrap(), 3);
    }

    #[test]
    fn actions_scoped_by_draft_id() {
        let db = test_db();
        db.append_action("draft_a", &Action::pick("A")).unwrap();
        db.append_action("draft_b", &Action::pick("B")).unwrap();
        db.append_action("draft_b", &Action::IncrementDraft).unwrap();

        assert_eq!(db.load_actions("draft_a").unwrap(), vec![Action::pick("A")]);
        assert_eq!(db.action_count("draft_b").unwrap(), 2);
        assert!(db.load_actions("draft_c").unwrap().is_empty());
    }

    #[test]
    fn unreadable_rows_skipped() {
        let db = test_db();
        db.append_action(TEST_DRAFT_ID, &Action::pick("A")).unwrap();
        db.conn()
            .execute(
                "INSERT INTO draft_actions (draft_id, action) VALUES (?1, ?2)",
                params![TEST_DRAFT_ID, r#"{"type":"NOMINATE"}"#],
            )
            .unwrap();
        db.append_action(TEST_DRAFT_ID, &Action::pick("B")).unwrap();

        let actions = db.load_actions(TEST_DRAFT_ID).unwrap();
        assert_eq!(actions, vec![Action::pick("A"), Action::pick("B")]);
    }

    #[test]
    fn has_draft_in_progress_tracks_log() {
        let db = test_db();
        assert!(!db.has_draft_in_progress(TEST_DRAFT_ID).unwrap());
        db.append_action(TEST_DRAFT_ID, &Action::StartDraft).unwrap();
        assert!(db.has_draft_in_progress(TEST_DRAFT_ID).unwrap());
        assert!(!db.has_draft_in_progress("other").unwrap());
    }

    #[test]
    fn save_and_load_state() {
        let db = test_db();
        assert!(db.load_state("missing").unwrap().is_none());

        db.save_state("view", &json!({"tracked": 3})).unwrap();
        db.save_state("view", &json!({"tracked": 4})).unwrap();
        assert_eq!(db.load_state("view").unwrap(), Some(json!({"tracked": 4})));
    }

    #[test]
    fn draft_id_round_trip() {
        let db = test_db();
        assert!(db.get_draft_id().unwrap().is_none());
        db.set_draft_id("draft_20260101_120000_000").unwrap();
        assert_eq!(
            db.get_draft_id().unwrap().as_deref(),
            Some("draft_20260101_120000_000")
        );
    }

    #[test]
    fn generate_draft_id_format() {
        let id = Database::generate_draft_id();
        assert!(id.starts_with("draft_"));
        // draft_ + YYYYMMDD + _ + HHMMSS + _ + mmm
        assert_eq!(id.len(), "draft_20260228_143022_123".len());
    }

    #[test]
    fn clear_draft_removes_everything() {
        let db = test_db();
        db.set_draft_id(TEST_DRAFT_ID).unwrap();
        db.append_action(TEST_DRAFT_ID, &Action::pick("A")).unwrap();

        db.clear_draft().unwrap();
        assert_eq!(db.action_count(TEST_DRAFT_ID).unwrap(), 0);
        assert!(db.get_draft_id().unwrap().is_none());
    }
}
