//! Catalog and development-user seeding.
//!
//! The mood catalog is read-only for repositories; this module is the one
//! place that writes it. Users belong to the external auth subsystem, and
//! `seed_user` exists only so local tooling has an owner to attach entries to.

use super::{DbError, DbResult};
use crate::model::now_epoch_ms;
use crate::model::user::UserId;
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

/// Mood names installed by `moodjournal init`.
pub const DEFAULT_MOODS: &[&str] = &[
    "happy", "calm", "grateful", "excited", "tired", "anxious", "sad", "angry",
];

/// Inserts every mood name not already in the catalog.
///
/// Returns the number of newly inserted moods. Blank names are skipped;
/// names are stored trimmed and compared case-sensitively by the unique index.
pub fn seed_moods<S: AsRef<str>>(conn: &Connection, names: &[S]) -> DbResult<usize> {
    let mut inserted = 0;
    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        inserted += conn.execute(
            "INSERT OR IGNORE INTO moods (id, name) VALUES (?1, ?2);",
            params![Uuid::new_v4().to_string(), name],
        )?;
    }
    info!("event=seed_moods module=db status=ok inserted={inserted}");
    Ok(inserted)
}

/// Returns the id of the user with `email`, inserting the user first when
/// missing. An existing user's password hash is left untouched.
pub fn seed_user(conn: &Connection, email: &str, password_hash: &str) -> DbResult<UserId> {
    let email = email.trim();
    if let Some(existing) = find_user_id(conn, email)? {
        return Ok(existing);
    }

    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO users (id, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4);",
        params![id.to_string(), email, password_hash, now_epoch_ms()],
    )?;
    info!("event=seed_user module=db status=ok user_id={id}");
    Ok(id)
}

fn find_user_id(conn: &Connection, email: &str) -> DbResult<Option<UserId>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT id FROM users WHERE email = ?1;",
            [email],
            |row| row.get(0),
        )
        .optional()?;
    match raw {
        Some(value) => Uuid::parse_str(&value)
            .map(Some)
            .map_err(|_| DbError::InvalidRow(format!("invalid uuid `{value}` in users.id"))),
        None => Ok(None),
    }
}
