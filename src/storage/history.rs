//! Conversation history storage layer.
//!
//! An append-only message log with a tail-trim operation, backed by `SQLite`.
//! The operation set is deliberately coarse (whole-history read, single-tail
//! mutation) because the use case is a sequential human conversation, not
//! random access. Row id order is append order; no reordering operation
//! exists.
//!
//! Each operation is a single statement (or transaction) and so is atomic
//! with respect to process crashes between operations. The store assumes a
//! single owner process; there is no file locking.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};

use crate::core::models::{Role, StoredMessage};
use crate::error::{ChatlineError, Result};
use crate::storage::history_schema::run_migrations;

/// History database access layer.
pub struct HistoryStore {
    conn: Connection,
}

impl HistoryStore {
    /// Create or open a history database at the given path.
    ///
    /// Creates the parent directory and the database file on first use.
    ///
    /// # Errors
    /// Returns an error if the parent directory cannot be created, the
    /// database cannot be opened, or schema migrations fail.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut conn = Connection::open(path)
            .map_err(|e| ChatlineError::Other(anyhow::anyhow!("open history db: {e}")))?;

        run_migrations(&mut conn)?;

        Ok(Self { conn })
    }

    /// Open an in-memory history database (for testing).
    ///
    /// # Errors
    /// Returns an error if the in-memory database cannot be opened or
    /// migrations fail.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()
            .map_err(|e| ChatlineError::Other(anyhow::anyhow!("open in-memory db: {e}")))?;

        run_migrations(&mut conn)?;

        Ok(Self { conn })
    }

    /// Append a message as the new last entry.
    ///
    /// # Errors
    /// Returns [`ChatlineError::InvalidInput`] for empty or whitespace-only
    /// content, or an error if the INSERT fails.
    pub fn append(&self, role: Role, content: &str) -> Result<i64> {
        if content.trim().is_empty() {
            return Err(ChatlineError::InvalidInput(
                "message content must not be empty".to_string(),
            ));
        }

        let mut stmt = self
            .conn
            .prepare_cached(
                "INSERT INTO messages (role, content, created_at) VALUES (?1, ?2, ?3)",
            )
            .map_err(|e| ChatlineError::Other(anyhow::anyhow!("prepare insert: {e}")))?;

        stmt.execute(params![role.as_str(), content, Utc::now().to_rfc3339()])
            .map_err(|e| ChatlineError::Other(anyhow::anyhow!("insert message: {e}")))?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Read the whole conversation in append order.
    ///
    /// Returns an empty vec when the store is empty. Never mutates.
    ///
    /// # Errors
    /// Returns an error if the SELECT query cannot be prepared or executed.
    pub fn read_all(&self) -> Result<Vec<StoredMessage>> {
        let mut stmt = self
            .conn
            .prepare_cached(
                "SELECT id, role, content, created_at FROM messages ORDER BY id ASC",
            )
            .map_err(|e| ChatlineError::Other(anyhow::anyhow!("prepare select: {e}")))?;

        let rows = stmt
            .query_map([], map_row)
            .map_err(|e| ChatlineError::Other(anyhow::anyhow!("query messages: {e}")))?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row.map_err(|e| ChatlineError::Other(anyhow::anyhow!("map row: {e}")))?);
        }

        Ok(messages)
    }

    /// Read the final message.
    ///
    /// # Errors
    /// Returns [`ChatlineError::EmptyHistory`] when the store is empty.
    pub fn read_last(&self) -> Result<StoredMessage> {
        let mut stmt = self
            .conn
            .prepare_cached(
                "SELECT id, role, content, created_at FROM messages \
                 ORDER BY id DESC LIMIT 1",
            )
            .map_err(|e| ChatlineError::Other(anyhow::anyhow!("prepare select: {e}")))?;

        let mut rows = stmt
            .query_map([], map_row)
            .map_err(|e| ChatlineError::Other(anyhow::anyhow!("query last message: {e}")))?;

        match rows.next() {
            Some(row) => row.map_err(|e| ChatlineError::Other(anyhow::anyhow!("map row: {e}"))),
            None => Err(ChatlineError::EmptyHistory),
        }
    }

    /// Remove exactly the final message; earlier messages are untouched.
    ///
    /// # Errors
    /// Returns [`ChatlineError::EmptyHistory`] when there is nothing to
    /// delete, or an error if the DELETE fails.
    pub fn delete_last(&self) -> Result<()> {
        let deleted = self
            .conn
            .execute(
                "DELETE FROM messages WHERE id = (SELECT MAX(id) FROM messages)",
                [],
            )
            .map_err(|e| ChatlineError::Other(anyhow::anyhow!("delete last message: {e}")))?;

        if deleted == 0 {
            return Err(ChatlineError::EmptyHistory);
        }

        Ok(())
    }

    /// Empty the history. Idempotent: clearing an empty store succeeds.
    ///
    /// # Errors
    /// Returns an error if the DELETE fails.
    pub fn clear(&self) -> Result<()> {
        self.conn
            .execute("DELETE FROM messages", [])
            .map_err(|e| ChatlineError::Other(anyhow::anyhow!("clear history: {e}")))?;

        Ok(())
    }

    /// Number of stored messages.
    ///
    /// # Errors
    /// Returns an error if the COUNT query fails.
    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))
            .map_err(|e| ChatlineError::Other(anyhow::anyhow!("count messages: {e}")))?;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        // COUNT(*) is non-negative and small
        Ok(count as usize)
    }

    /// Whether the store holds no messages.
    ///
    /// # Errors
    /// Returns an error if the COUNT query fails.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<StoredMessage> {
    let role_name: String = row.get(1)?;
    let role = Role::from_name(&role_name).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(StoredMessage {
        id: row.get(0)?,
        role,
        content: row.get(2)?,
        created_at: parse_timestamp(&row.get::<_, String>(3)?).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?,
    })
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ChatlineError::Other(anyhow::anyhow!("invalid timestamp '{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp_store() -> HistoryStore {
        HistoryStore::open_in_memory().expect("open store")
    }

    #[test]
    fn append_and_read_round_trip() {
        let store = open_temp_store();

        for i in 0..3 {
            store
                .append(Role::User, &format!("question {i}"))
                .expect("append user");
            store
                .append(Role::Assistant, &format!("answer {i}"))
                .expect("append assistant");
        }

        let messages = store.read_all().expect("read all");
        assert_eq!(messages.len(), 6);
        for (i, pair) in messages.chunks(2).enumerate() {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[0].content, format!("question {i}"));
            assert_eq!(pair[1].role, Role::Assistant);
            assert_eq!(pair[1].content, format!("answer {i}"));
        }
    }

    #[test]
    fn read_all_on_empty_store_is_empty() {
        let store = open_temp_store();
        assert!(store.read_all().expect("read all").is_empty());
        assert!(store.is_empty().expect("is_empty"));
    }

    #[test]
    fn append_rejects_blank_content() {
        let store = open_temp_store();

        assert!(matches!(
            store.append(Role::User, ""),
            Err(ChatlineError::InvalidInput(_))
        ));
        assert!(matches!(
            store.append(Role::User, "   \n\t"),
            Err(ChatlineError::InvalidInput(_))
        ));
        assert_eq!(store.len().expect("len"), 0);
    }

    #[test]
    fn read_last_returns_newest_message() {
        let store = open_temp_store();
        store.append(Role::User, "first").expect("append");
        store.append(Role::Assistant, "second").expect("append");

        let last = store.read_last().expect("read last");
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "second");
    }

    #[test]
    fn read_last_on_empty_store_reports_empty_history() {
        let store = open_temp_store();
        assert!(matches!(
            store.read_last(),
            Err(ChatlineError::EmptyHistory)
        ));
    }

    #[test]
    fn delete_last_preserves_order_of_earlier_messages() {
        let store = open_temp_store();
        store.append(Role::User, "A").expect("append A");
        store.append(Role::Assistant, "B").expect("append B");

        store.delete_last().expect("delete last");

        let messages = store.read_all().expect("read all");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "A");
        assert_eq!(messages[0].role, Role::User);
    }

    #[test]
    fn delete_last_on_empty_store_is_safe() {
        let store = open_temp_store();

        assert!(matches!(
            store.delete_last(),
            Err(ChatlineError::EmptyHistory)
        ));
        // Store still usable and still empty afterwards.
        assert_eq!(store.len().expect("len"), 0);
        store.append(Role::User, "still works").expect("append");
        assert_eq!(store.len().expect("len"), 1);
    }

    #[test]
    fn clear_is_idempotent() {
        let store = open_temp_store();
        store.append(Role::User, "hello").expect("append");

        store.clear().expect("first clear");
        store.clear().expect("second clear");

        assert!(store.read_all().expect("read all").is_empty());
    }

    #[test]
    fn ids_keep_increasing_after_tail_deletes() {
        let store = open_temp_store();
        store.append(Role::User, "one").expect("append");
        let second = store.append(Role::User, "two").expect("append");
        store.delete_last().expect("delete");
        let third = store.append(Role::User, "three").expect("append");

        // AUTOINCREMENT never reuses ids, so append order stays unambiguous.
        assert!(third > second);
        let messages = store.read_all().expect("read all");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "one");
        assert_eq!(messages[1].content, "three");
    }
}
