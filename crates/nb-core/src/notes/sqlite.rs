use std::{
    fs,
    path::Path,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use rusqlite::{params, Connection, Transaction};

use crate::{
    domain::UserId,
    errors::Error,
    notes::{checked_offset, enumerate_notes, filter_matching, ListedNote, NoteStore},
    Result,
};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS notes (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    text    TEXT    NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_notes_user_id ON notes (user_id, id);
";

/// SQLite-backed store. Each operation is one short transaction on a blocking thread.
#[derive(Clone)]
pub struct SqliteNoteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteNoteStore {
    /// Open (or create) the database file and make sure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || -> Result<T> {
            let mut conn = conn
                .lock()
                .map_err(|_| Error::External("sqlite connection lock poisoned".to_string()))?;
            let tx = conn.transaction()?;
            let out = op(&tx)?;
            tx.commit()?;
            Ok(out)
        })
        .await
        .map_err(|e| Error::External(format!("storage task failed: {e}")))?
    }
}

fn count_notes(tx: &Transaction<'_>, user_id: UserId) -> Result<usize> {
    let n: i64 = tx.query_row(
        "SELECT COUNT(*) FROM notes WHERE user_id = ?1",
        params![user_id.0],
        |row| row.get(0),
    )?;
    Ok(n as usize)
}

fn note_texts(tx: &Transaction<'_>, user_id: UserId) -> Result<Vec<String>> {
    let mut stmt = tx.prepare("SELECT text FROM notes WHERE user_id = ?1 ORDER BY id")?;
    let rows = stmt
        .query_map(params![user_id.0], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[async_trait]
impl NoteStore for SqliteNoteStore {
    async fn add(&self, user_id: UserId, text: &str) -> Result<usize> {
        let text = text.to_string();
        self.run(move |tx| {
            tx.execute(
                "INSERT INTO notes (user_id, text) VALUES (?1, ?2)",
                params![user_id.0, text],
            )?;
            count_notes(tx, user_id)
        })
        .await
    }

    async fn list(&self, user_id: UserId) -> Result<Vec<ListedNote>> {
        self.run(move |tx| Ok(enumerate_notes(note_texts(tx, user_id)?)))
            .await
    }

    async fn delete_at(&self, user_id: UserId, position: i64) -> Result<String> {
        self.run(move |tx| {
            let offset = checked_offset(position, count_notes(tx, user_id)?)?;
            let (id, text): (i64, String) = tx.query_row(
                "SELECT id, text FROM notes WHERE user_id = ?1 ORDER BY id LIMIT 1 OFFSET ?2",
                params![user_id.0, offset as i64],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;
            tx.execute("DELETE FROM notes WHERE id = ?1", params![id])?;
            Ok(text)
        })
        .await
    }

    async fn clear(&self, user_id: UserId) -> Result<()> {
        self.run(move |tx| {
            tx.execute("DELETE FROM notes WHERE user_id = ?1", params![user_id.0])?;
            Ok(())
        })
        .await
    }

    async fn search(&self, user_id: UserId, query: &str) -> Result<Vec<ListedNote>> {
        if query.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }
        // SQLite's LOWER() only folds ASCII; match in Rust so Cyrillic works too.
        filter_matching(self.list(user_id).await?, query)
    }

    async fn count(&self, user_id: UserId) -> Result<usize> {
        self.run(move |tx| count_notes(tx, user_id)).await
    }
}
