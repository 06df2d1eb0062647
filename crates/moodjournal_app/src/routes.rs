//! Journal loaders and actions.
//!
//! # Responsibility
//! - Reproduce the `/journal` route handlers without tying them to an HTTP
//!   server: each handler takes the session gate plus raw route params/form
//!   fields and returns a `Response` envelope.
//! - Open one store connection per call and drop it before returning.
//!
//! # Invariants
//! - Every handler asks the session gate first; `None` short-circuits to a
//!   login redirect before the store is touched.
//! - Malformed entry ids behave like unknown ids.
//! - Store failures surface as `Err(AppError)`; nothing is retried.

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::forms::{EntryForm, FieldErrors};
use crate::render::{render_markdown, render_preview};
use crate::session::{SessionGate, LOGIN_PATH};
use chrono::NaiveDateTime;
use log::debug;
use moodjournal_core::db::{open_db, seed_moods, seed_user};
use moodjournal_core::{
    Entry, EntryId, EntryService, EntrySummary, Mood, MoodRepository, RepoError,
    SqliteEntryRepository, SqliteMoodRepository, UserId,
};
use rusqlite::Connection;
use serde::Serialize;
use std::path::{Path, PathBuf};

const JOURNAL_PATH: &str = "/journal";
const DEFAULT_TITLE_FORMAT: &str = "%B %d, %Y // %-I:%M %p";

/// Outcome of a loader or action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response<T> {
    Ok { data: T },
    Redirect { location: String },
    Invalid { errors: FieldErrors },
    NotFound,
    Unauthorized { redirect_to: String },
}

impl<T> Response<T> {
    /// HTTP status the envelope maps to.
    pub fn status(&self) -> u16 {
        match self {
            Self::Ok { .. } => 200,
            Self::Redirect { .. } | Self::Unauthorized { .. } => 302,
            Self::Invalid { .. } => 400,
            Self::NotFound => 404,
        }
    }

    fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect {
            location: location.into(),
        }
    }

    fn unauthorized() -> Self {
        Self::Unauthorized {
            redirect_to: LOGIN_PATH.to_string(),
        }
    }
}

impl<T: Serialize> Response<T> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `/journal` loader data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalIndex {
    pub entry_list_items: Vec<EntrySummary>,
}

/// `/journal/:id` loader data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryDetail {
    pub entry: Entry,
    /// Body rendered to HTML under the configured raw-HTML policy.
    pub html: String,
}

/// `/journal/edit/:id` loader data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryEditForm {
    pub entry: Entry,
}

/// `/journal/new` loader data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntryForm {
    pub moods: Vec<Mood>,
    pub default_title: String,
}

/// Journal application: configuration plus the route handlers.
#[derive(Debug, Clone)]
pub struct JournalApp {
    config: AppConfig,
}

impl JournalApp {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Loads `config_path` (defaults when absent), applies the env and
    /// `db_override` db paths, and starts file logging if configured.
    pub fn bootstrap(
        config_path: Option<&Path>,
        db_override: Option<PathBuf>,
    ) -> AppResult<Self> {
        let mut config = AppConfig::load(config_path)?;
        if let Some(db_path) = db_override {
            config.db_path = db_path;
        }
        config.init_logging()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Creates/migrates the store and installs any missing catalog moods.
    /// Returns how many moods were added.
    pub fn init_store(&self, moods: &[&str]) -> AppResult<usize> {
        let conn = self.open()?;
        Ok(seed_moods(&conn, moods)?)
    }

    /// Development helper: returns the id for `email`, creating the user if
    /// needed.
    pub fn seed_user(&self, email: &str, password_hash: &str) -> AppResult<UserId> {
        let conn = self.open()?;
        Ok(seed_user(&conn, email, password_hash)?)
    }

    /// Mood catalog, for pickers.
    pub fn moods(&self) -> AppResult<Vec<Mood>> {
        let conn = self.open()?;
        let repo = SqliteMoodRepository::try_new(&conn)?;
        Ok(repo.list_moods()?)
    }

    /// `/journal` loader.
    pub fn journal_index(&self, session: &impl SessionGate) -> AppResult<Response<JournalIndex>> {
        let Some(user_id) = session.require_user_id() else {
            return Ok(Response::unauthorized());
        };
        let mut conn = self.open()?;
        let service = self.entry_service(&mut conn)?;
        let entry_list_items = service.list_entries(user_id)?;
        Ok(logged(
            "journal_index",
            Response::Ok {
                data: JournalIndex { entry_list_items },
            },
        ))
    }

    /// `/journal/:id` loader.
    pub fn entry_detail(
        &self,
        session: &impl SessionGate,
        entry_id: &str,
    ) -> AppResult<Response<EntryDetail>> {
        let Some(user_id) = session.require_user_id() else {
            return Ok(Response::unauthorized());
        };
        let response = match self.load_owned(user_id, entry_id)? {
            Some(entry) => {
                let html = render_markdown(&entry.body, self.config.raw_html);
                Response::Ok {
                    data: EntryDetail { entry, html },
                }
            }
            None => Response::NotFound,
        };
        Ok(logged("entry_detail", response))
    }

    /// `/journal/:id` action. Always lands back on the journal, whether or
    /// not anything was deleted.
    pub fn entry_delete(
        &self,
        session: &impl SessionGate,
        entry_id: &str,
    ) -> AppResult<Response<()>> {
        let Some(user_id) = session.require_user_id() else {
            return Ok(Response::unauthorized());
        };
        if let Some(id) = parse_entry_id(entry_id) {
            let mut conn = self.open()?;
            let service = self.entry_service(&mut conn)?;
            service.delete_entry(id, user_id)?;
        }
        Ok(logged("entry_delete", Response::redirect(JOURNAL_PATH)))
    }

    /// `/journal/new` loader. `now` is the caller's local time.
    pub fn new_entry_form(
        &self,
        session: &impl SessionGate,
        now: NaiveDateTime,
    ) -> AppResult<Response<NewEntryForm>> {
        if session.require_user_id().is_none() {
            return Ok(Response::unauthorized());
        }
        let moods = self.moods()?;
        Ok(logged(
            "new_entry_form",
            Response::Ok {
                data: NewEntryForm {
                    moods,
                    default_title: default_title(now),
                },
            },
        ))
    }

    /// `/journal/new` action.
    pub fn entry_create(
        &self,
        session: &impl SessionGate,
        form: &EntryForm,
    ) -> AppResult<Response<()>> {
        let Some(user_id) = session.require_user_id() else {
            return Ok(Response::unauthorized());
        };
        let valid = match form.validate() {
            Ok(valid) => valid,
            Err(errors) => return Ok(logged("entry_create", Response::Invalid { errors })),
        };

        let mut conn = self.open()?;
        let mut service = self.entry_service(&mut conn)?;
        let entry = service.create_entry(&valid.title, &valid.body, user_id, &valid.mood_ids)?;
        Ok(logged("entry_create", Response::redirect(entry_path(entry.id))))
    }

    /// Composer preview; `None` while the body is empty.
    pub fn entry_preview(&self, body: &str) -> Option<String> {
        render_preview(body, self.config.raw_html)
    }

    /// `/journal/edit/:id` loader.
    pub fn entry_edit_form(
        &self,
        session: &impl SessionGate,
        entry_id: &str,
    ) -> AppResult<Response<EntryEditForm>> {
        let Some(user_id) = session.require_user_id() else {
            return Ok(Response::unauthorized());
        };
        let response = match self.load_owned(user_id, entry_id)? {
            Some(entry) => Response::Ok {
                data: EntryEditForm { entry },
            },
            None => Response::NotFound,
        };
        Ok(logged("entry_edit_form", response))
    }

    /// `/journal/edit/:id` action. Only title and body are read from the
    /// form. Ownership is enforced only when the configured update policy
    /// asks for it.
    pub fn entry_update(
        &self,
        session: &impl SessionGate,
        entry_id: &str,
        form: &EntryForm,
    ) -> AppResult<Response<()>> {
        let Some(user_id) = session.require_user_id() else {
            return Ok(Response::unauthorized());
        };
        let text = match form.validate_text() {
            Ok(text) => text,
            Err(errors) => return Ok(logged("entry_update", Response::Invalid { errors })),
        };
        let Some(id) = parse_entry_id(entry_id) else {
            return Ok(logged("entry_update", Response::NotFound));
        };

        let mut conn = self.open()?;
        let service = self.entry_service(&mut conn)?;
        let response = match service.update_entry(user_id, id, &text.title, &text.body) {
            Ok(entry) => Response::redirect(entry_path(entry.id)),
            Err(RepoError::NotFound(_)) => Response::NotFound,
            Err(err) => return Err(err.into()),
        };
        Ok(logged("entry_update", response))
    }

    fn load_owned(&self, user_id: UserId, entry_id: &str) -> AppResult<Option<Entry>> {
        let Some(id) = parse_entry_id(entry_id) else {
            return Ok(None);
        };
        let mut conn = self.open()?;
        let service = self.entry_service(&mut conn)?;
        Ok(service.get_entry(id, user_id)?)
    }

    fn open(&self) -> AppResult<Connection> {
        Ok(open_db(&self.config.db_path)?)
    }

    fn entry_service<'conn>(
        &self,
        conn: &'conn mut Connection,
    ) -> AppResult<EntryService<SqliteEntryRepository<'conn>>> {
        let repo = SqliteEntryRepository::try_new(conn)?;
        Ok(EntryService::with_policy(repo, self.config.update_policy))
    }
}

/// Title prefilled in the new-entry form, e.g. `March 04, 2024 // 9:05 PM`.
pub fn default_title(now: NaiveDateTime) -> String {
    now.format(DEFAULT_TITLE_FORMAT).to_string()
}

fn parse_entry_id(raw: &str) -> Option<EntryId> {
    EntryId::parse_str(raw.trim()).ok()
}

fn entry_path(id: EntryId) -> String {
    format!("{JOURNAL_PATH}/{id}")
}

fn logged<T>(route: &str, response: Response<T>) -> Response<T> {
    debug!(
        "event=route module=app route={route} status={}",
        response.status()
    );
    response
}
