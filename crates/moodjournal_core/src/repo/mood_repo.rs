//! Mood catalog repository.
//!
//! The catalog is read-only here; seeding lives in `db::seed`.

use crate::model::mood::Mood;
use crate::repo::{ensure_connection_ready, parse_uuid, RepoResult};
use rusqlite::Connection;

/// Repository interface for the mood catalog.
pub trait MoodRepository {
    /// Returns the full catalog in store order.
    fn list_moods(&self) -> RepoResult<Vec<Mood>>;
}

/// SQLite-backed mood catalog.
pub struct SqliteMoodRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMoodRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["moods"])?;
        Ok(Self { conn })
    }
}

impl MoodRepository for SqliteMoodRepository<'_> {
    fn list_moods(&self) -> RepoResult<Vec<Mood>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM moods;")?;
        let mut rows = stmt.query([])?;
        let mut moods = Vec::new();
        while let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            moods.push(Mood {
                id: parse_uuid(&id_text, "moods.id")?,
                name: row.get("name")?,
            });
        }
        Ok(moods)
    }
}
