//! Entry repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over journal entries, scoped by owning user.
//! - Attach mood links at creation in the same transaction as the entry row.
//!
//! # Invariants
//! - `get_entry`/`list_entries`/`delete_entry` always filter by owner; an
//!   ownership mismatch looks exactly like an absent row.
//! - `create_entry` is all-or-nothing: an unknown mood id or owner fails the
//!   insert through foreign keys and leaves no entry behind.
//! - `update_entry` only filters by owner when asked to (`UpdateScope`).
//! - `updated_at` strictly increases on every successful update.

use crate::model::entry::{Entry, EntryId, EntrySummary};
use crate::model::mood::{Mood, MoodId};
use crate::model::now_epoch_ms;
use crate::model::user::UserId;
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::collections::BTreeSet;

const REQUIRED_TABLES: &[&str] = &["users", "moods", "entries", "entry_moods"];

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    title,
    body,
    created_at,
    updated_at,
    user_id
FROM entries";

/// Ownership predicate applied by `update_entry`.
///
/// `Unchecked` is the historical contract: any caller that knows an entry id
/// can overwrite it. `Owner` restricts the update to the owning user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateScope {
    Unchecked,
    Owner(UserId),
}

/// Repository interface for journal entries.
pub trait EntryRepository {
    /// Gets one entry by id when owned by `user_id`.
    fn get_entry(&self, id: EntryId, user_id: UserId) -> RepoResult<Option<Entry>>;
    /// Lists the user's entries, most recently updated first.
    fn list_entries(&self, user_id: UserId) -> RepoResult<Vec<EntrySummary>>;
    /// Creates one entry owned by `user_id` linked to `mood_ids`.
    fn create_entry(
        &mut self,
        title: &str,
        body: &str,
        user_id: UserId,
        mood_ids: &[MoodId],
    ) -> RepoResult<Entry>;
    /// Overwrites title and body.
    fn update_entry(
        &self,
        id: EntryId,
        title: &str,
        body: &str,
        scope: UpdateScope,
    ) -> RepoResult<Entry>;
    /// Deletes the entry when owned by `user_id`; returns deleted row count.
    fn delete_entry(&self, id: EntryId, user_id: UserId) -> RepoResult<usize>;
}

/// SQLite-backed entry repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn get_entry(&self, id: EntryId, user_id: UserId) -> RepoResult<Option<Entry>> {
        select_entry(self.conn, id, Some(user_id))
    }

    fn list_entries(&self, user_id: UserId) -> RepoResult<Vec<EntrySummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                id,
                title,
                body,
                created_at
             FROM entries
             WHERE user_id = ?1
             ORDER BY updated_at DESC, id ASC;",
        )?;

        let mut rows = stmt.query([user_id.to_string()])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            entries.push(EntrySummary {
                id: parse_uuid(&id_text, "entries.id")?,
                title: row.get("title")?,
                body: row.get("body")?,
                created_at: row.get("created_at")?,
            });
        }

        Ok(entries)
    }

    fn create_entry(
        &mut self,
        title: &str,
        body: &str,
        user_id: UserId,
        mood_ids: &[MoodId],
    ) -> RepoResult<Entry> {
        let id = EntryId::new_v4();
        let id_text = id.to_string();
        let now = now_epoch_ms();
        let unique_moods: BTreeSet<MoodId> = mood_ids.iter().copied().collect();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO entries (
                id,
                title,
                body,
                created_at,
                updated_at,
                user_id
            ) VALUES (?1, ?2, ?3, ?4, ?4, ?5);",
            params![id_text.as_str(), title, body, now, user_id.to_string()],
        )?;

        for mood_id in &unique_moods {
            tx.execute(
                "INSERT INTO entry_moods (entry_id, mood_id) VALUES (?1, ?2);",
                params![id_text.as_str(), mood_id.to_string()],
            )?;
        }

        let created = select_entry(&tx, id, None)?.ok_or_else(|| {
            RepoError::InvalidData(format!("entry {id} missing after insert"))
        })?;
        tx.commit()?;
        Ok(created)
    }

    fn update_entry(
        &self,
        id: EntryId,
        title: &str,
        body: &str,
        scope: UpdateScope,
    ) -> RepoResult<Entry> {
        let owner = match scope {
            UpdateScope::Unchecked => None,
            UpdateScope::Owner(user_id) => Some(user_id.to_string()),
        };

        let changed = self.conn.execute(
            "UPDATE entries
             SET
                title = ?2,
                body = ?3,
                updated_at = MAX(?4, updated_at + 1)
             WHERE id = ?1
               AND (?5 IS NULL OR user_id = ?5);",
            params![id.to_string(), title, body, now_epoch_ms(), owner],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        select_entry(self.conn, id, None)?.ok_or(RepoError::NotFound(id))
    }

    fn delete_entry(&self, id: EntryId, user_id: UserId) -> RepoResult<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM entries WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), user_id.to_string()],
        )?;
        Ok(deleted)
    }
}

fn select_entry(
    conn: &Connection,
    id: EntryId,
    owner: Option<UserId>,
) -> RepoResult<Option<Entry>> {
    let mut stmt = conn.prepare(&format!(
        "{ENTRY_SELECT_SQL}
         WHERE id = ?1
           AND (?2 IS NULL OR user_id = ?2);"
    ))?;

    let mut rows = stmt.query(params![id.to_string(), owner.map(|value| value.to_string())])?;
    if let Some(row) = rows.next()? {
        let mut entry = parse_entry_row(row)?;
        entry.moods = load_moods_for_entry(conn, entry.id)?;
        return Ok(Some(entry));
    }

    Ok(None)
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<Entry> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    Ok(Entry {
        id: parse_uuid(&id_text, "entries.id")?,
        title: row.get("title")?,
        body: row.get("body")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        user_id: parse_uuid(&user_text, "entries.user_id")?,
        moods: Vec::new(),
    })
}

fn load_moods_for_entry(conn: &Connection, entry_id: EntryId) -> RepoResult<Vec<Mood>> {
    let mut stmt = conn.prepare(
        "SELECT m.id, m.name
         FROM entry_moods em
         INNER JOIN moods m ON m.id = em.mood_id
         WHERE em.entry_id = ?1
         ORDER BY m.name ASC;",
    )?;
    let mut rows = stmt.query([entry_id.to_string()])?;
    let mut moods = Vec::new();
    while let Some(row) = rows.next()? {
        let id_text: String = row.get(0)?;
        moods.push(Mood {
            id: parse_uuid(&id_text, "moods.id")?,
            name: row.get(1)?,
        });
    }
    Ok(moods)
}
