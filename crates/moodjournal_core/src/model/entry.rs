//! Journal entry records.
//!
//! # Invariants
//! - `user_id` is set at creation and never changes.
//! - `moods` is fixed at creation; updates touch only `title` and `body`.
//! - `updated_at >= created_at`.

use crate::model::mood::Mood;
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable entry identifier.
pub type EntryId = Uuid;

/// Full entry read model returned by detail, create and update paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub title: String,
    /// Markdown source.
    pub body: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub user_id: UserId,
    /// Linked moods sorted by name. Order carries no meaning.
    pub moods: Vec<Mood>,
}

impl Entry {
    /// Whether `user_id` owns this entry.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// List item for the journal index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySummary {
    pub id: EntryId,
    pub title: String,
    pub body: String,
    pub created_at: i64,
}
