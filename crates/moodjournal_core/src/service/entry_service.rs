//! Entry use-case service.
//!
//! # Responsibility
//! - Expose get/list/create/update/delete over any `EntryRepository`.
//! - Translate the configured `UpdatePolicy` into a repository `UpdateScope`.
//!
//! # Invariants
//! - Repository errors are returned unchanged; the service never retries.
//! - Log lines carry ids, counts and durations only, never titles or bodies.
//! - The acting `UserId` comes from the auth collaborator and is not
//!   re-verified here.

use crate::model::entry::{Entry, EntryId, EntrySummary};
use crate::model::mood::MoodId;
use crate::model::user::UserId;
use crate::repo::entry_repo::{EntryRepository, UpdateScope};
use crate::repo::RepoResult;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::time::Instant;

/// Who may overwrite an entry's title and body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdatePolicy {
    /// Any authenticated caller that knows the entry id. Historical behavior.
    #[default]
    Unchecked,
    /// Only the owning user; other callers see `RepoError::NotFound`.
    OwnerOnly,
}

impl UpdatePolicy {
    /// Repository scope for an update issued by `actor`.
    pub fn scope_for(self, actor: UserId) -> UpdateScope {
        match self {
            Self::Unchecked => UpdateScope::Unchecked,
            Self::OwnerOnly => UpdateScope::Owner(actor),
        }
    }
}

/// Entry service facade over repository implementations.
pub struct EntryService<R: EntryRepository> {
    repo: R,
    update_policy: UpdatePolicy,
}

impl<R: EntryRepository> EntryService<R> {
    /// Creates a service with the default (`Unchecked`) update policy.
    pub fn new(repo: R) -> Self {
        Self::with_policy(repo, UpdatePolicy::default())
    }

    /// Creates a service with an explicit update policy.
    pub fn with_policy(repo: R, update_policy: UpdatePolicy) -> Self {
        Self {
            repo,
            update_policy,
        }
    }

    pub fn update_policy(&self) -> UpdatePolicy {
        self.update_policy
    }

    /// Gets one entry owned by `user_id`. `None` covers both absence and
    /// foreign ownership.
    pub fn get_entry(&self, id: EntryId, user_id: UserId) -> RepoResult<Option<Entry>> {
        let started_at = Instant::now();
        let result = self.repo.get_entry(id, user_id);
        match &result {
            Ok(found) => debug!(
                "event=entry_get module=service status=ok entry_id={id} found={} duration_ms={}",
                found.is_some(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("entry_get", started_at, err),
        }
        result
    }

    /// Lists the user's entries, most recently updated first.
    pub fn list_entries(&self, user_id: UserId) -> RepoResult<Vec<EntrySummary>> {
        let started_at = Instant::now();
        let result = self.repo.list_entries(user_id);
        match &result {
            Ok(items) => debug!(
                "event=entry_list module=service status=ok count={} duration_ms={}",
                items.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("entry_list", started_at, err),
        }
        result
    }

    /// Creates one entry with its mood links.
    pub fn create_entry(
        &mut self,
        title: &str,
        body: &str,
        user_id: UserId,
        mood_ids: &[MoodId],
    ) -> RepoResult<Entry> {
        let started_at = Instant::now();
        let result = self.repo.create_entry(title, body, user_id, mood_ids);
        match &result {
            Ok(entry) => info!(
                "event=entry_create module=service status=ok entry_id={} mood_count={} duration_ms={}",
                entry.id,
                entry.moods.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("entry_create", started_at, err),
        }
        result
    }

    /// Overwrites title and body on behalf of `actor`, scoped by the
    /// configured policy.
    pub fn update_entry(
        &self,
        actor: UserId,
        id: EntryId,
        title: &str,
        body: &str,
    ) -> RepoResult<Entry> {
        let started_at = Instant::now();
        let scope = self.update_policy.scope_for(actor);
        let result = self.repo.update_entry(id, title, body, scope);
        match &result {
            Ok(entry) => {
                if !entry.is_owned_by(actor) {
                    // Allowed under `Unchecked`; keep a trail of it.
                    warn!(
                        "event=entry_update module=service status=foreign_owner entry_id={id}"
                    );
                }
                info!(
                    "event=entry_update module=service status=ok entry_id={id} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
            }
            Err(err) => log_failure("entry_update", started_at, err),
        }
        result
    }

    /// Deletes the entry when owned by `user_id`; zero means nothing matched.
    pub fn delete_entry(&self, id: EntryId, user_id: UserId) -> RepoResult<usize> {
        let started_at = Instant::now();
        let result = self.repo.delete_entry(id, user_id);
        match &result {
            Ok(deleted) => info!(
                "event=entry_delete module=service status=ok entry_id={id} deleted={deleted} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("entry_delete", started_at, err),
        }
        result
    }
}

fn log_failure(event: &str, started_at: Instant, err: &impl Display) {
    warn!(
        "event={event} module=service status=error duration_ms={} error={}",
        started_at.elapsed().as_millis(),
        err
    );
}

#[cfg(test)]
mod tests {
    use super::UpdatePolicy;
    use crate::repo::entry_repo::UpdateScope;
    use uuid::Uuid;

    #[test]
    fn policy_maps_to_repository_scope() {
        let actor = Uuid::new_v4();
        assert_eq!(UpdatePolicy::Unchecked.scope_for(actor), UpdateScope::Unchecked);
        assert_eq!(UpdatePolicy::OwnerOnly.scope_for(actor), UpdateScope::Owner(actor));
    }

    #[test]
    fn default_policy_keeps_unchecked_updates() {
        assert_eq!(UpdatePolicy::default(), UpdatePolicy::Unchecked);
    }
}
