//! Mood catalog tag.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable mood identifier.
pub type MoodId = Uuid;

/// One tag of the pre-seeded mood catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mood {
    pub id: MoodId,
    pub name: String,
}
