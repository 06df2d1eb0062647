//! Journal data core: store bootstrap, entry/mood repositories and the entry
//! use-case service.
//!
//! Everything here runs against a caller-constructed SQLite connection; the
//! crate holds no global store handle. Identity is supplied by the caller and
//! trusted as-is.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::entry::{Entry, EntryId, EntrySummary};
pub use model::mood::{Mood, MoodId};
pub use model::user::UserId;
pub use repo::entry_repo::{EntryRepository, SqliteEntryRepository, UpdateScope};
pub use repo::mood_repo::{MoodRepository, SqliteMoodRepository};
pub use repo::{RepoError, RepoResult};
pub use service::entry_service::{EntryService, UpdatePolicy};

