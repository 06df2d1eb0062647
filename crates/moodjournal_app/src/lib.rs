//! Journal route layer.
//!
//! Framework-free loaders and actions for the `/journal` pages: request
//! identity via `SessionGate`, form validation, Markdown rendering and
//! redirect/404/400 envelopes over the `moodjournal_core` store.

pub mod config;
pub mod error;
pub mod forms;
pub mod render;
pub mod routes;
pub mod session;

pub use config::{AppConfig, ConfigError, DB_PATH_ENV};
pub use error::{AppError, AppResult};
pub use forms::{EntryForm, EntryText, FieldErrors, ValidEntry};
pub use render::{render_markdown, render_preview, RawHtml};
pub use routes::{
    default_title, EntryDetail, EntryEditForm, JournalApp, JournalIndex, NewEntryForm, Response,
};
pub use session::{SessionGate, StaticSession, LOGIN_PATH};
