// SQLite persistence layer for the participant store.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::exchange::Participant;

/// SQLite-backed participant store.
///
/// Exposes the small surface the exchange needs: list everything, find the
/// first record matching a name, update named fields by id.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure the schema
    /// exists. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS participants (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                name      TEXT NOT NULL,
                wishlist  TEXT,
                excluded  INTEGER NOT NULL DEFAULT 0,
                has_drawn INTEGER NOT NULL DEFAULT 0,
                drawn_at  TEXT
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Insert a new participant with both flags clear and no wishlist.
    /// Returns the store-assigned id.
    pub fn add_participant(&self, name: &str) -> Result<i64> {
        let conn = self.conn();
        let id: i64 = conn
            .query_row(
                "INSERT INTO participants (name) VALUES (?1) RETURNING id",
                params![name],
                |row| row.get(0),
            )
            .context("failed to insert participant")?;
        Ok(id)
    }

    /// Load every participant, ordered by id. A NULL or unparseable
    /// `wishlist` column maps to an empty list.
    pub fn list_participants(&self) -> Result<Vec<Participant>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT id, name, wishlist, excluded, has_drawn
                 FROM participants ORDER BY id",
            )
            .context("failed to prepare list_participants query")?;

        let participants = stmt
            .query_map([], |row| {
                let wishlist_json: Option<String> = row.get(2)?;
                Ok(Participant {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    wishlist: wishlist_json
                        .and_then(|json_str| serde_json::from_str::<Vec<String>>(&json_str).ok())
                        .unwrap_or_default(),
                    excluded: row.get(3)?,
                    has_drawn: row.get(4)?,
                })
            })
            .context("failed to query participants")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map participant rows")?;

        Ok(participants)
    }

    /// Find the first participant whose name equals `name` exactly
    /// (case-sensitive). Name uniqueness is assumed but not enforced;
    /// duplicates resolve to the lowest id.
    pub fn find_by_name(&self, name: &str) -> Result<Option<Participant>> {
        let conn = self.conn();
        let participant = conn
            .query_row(
                "SELECT id, name, wishlist, excluded, has_drawn
                 FROM participants WHERE name = ?1 ORDER BY id LIMIT 1",
                params![name],
                |row| {
                    let wishlist_json: Option<String> = row.get(2)?;
                    Ok(Participant {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        wishlist: wishlist_json
                            .and_then(|json_str| {
                                serde_json::from_str::<Vec<String>>(&json_str).ok()
                            })
                            .unwrap_or_default(),
                        excluded: row.get(3)?,
                        has_drawn: row.get(4)?,
                    })
                },
            )
            .optional()
            .context("failed to query participant by name")?;
        Ok(participant)
    }

    /// Replace a participant's wishlist with `items` (overwrite, not merge).
    /// The list is stored as a JSON array string.
    pub fn update_wishlist(&self, id: i64, items: &[String]) -> Result<()> {
        let conn = self.conn();
        let wishlist_json =
            serde_json::to_string(items).context("failed to serialize wishlist")?;
        conn.execute(
            "UPDATE participants SET wishlist = ?2 WHERE id = ?1",
            params![id, wishlist_json],
        )
        .context("failed to update wishlist")?;
        Ok(())
    }

    /// Mark the participant as drawn by setting `excluded` and `has_drawn`
    /// together, recording the draw time. The update is conditional on both
    /// flags still being clear: it returns `false` when a concurrent draw
    /// already claimed this participant, so a draw can never be persisted
    /// twice for the same record.
    pub fn mark_drawn(&self, id: i64) -> Result<bool> {
        let conn = self.conn();
        let changed = conn
            .execute(
                "UPDATE participants
                 SET excluded = 1,
                     has_drawn = 1,
                     drawn_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1 AND excluded = 0 AND has_drawn = 0",
                params![id],
            )
            .context("failed to mark participant drawn")?;
        Ok(changed == 1)
    }

    /// Return the number of stored participants.
    pub fn participant_count(&self) -> Result<usize> {
        let conn = self.conn();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM participants", [], |row| row.get(0))
            .context("failed to count participants")?;
        Ok(count as usize)
    }

    /// Insert the given names when the participants table is empty. Returns
    /// the number of rows inserted (zero when the table already has data).
    /// Used at startup to seed a fresh deployment from config.
    pub fn seed_if_empty(&self, names: &[String]) -> Result<usize> {
        if names.is_empty() || self.participant_count()? > 0 {
            return Ok(0);
        }

        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin seed transaction")?;
        for name in names {
            tx.execute(
                "INSERT INTO participants (name) VALUES (?1)",
                params![name],
            )
            .context("failed to insert seed participant")?;
        }
        tx.commit().context("failed to commit seed")?;
        Ok(names.len())
    }
}
