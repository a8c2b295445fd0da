//! Tracker - owns persistence around the engine
//!
//! One update is: load the user's document, read the repository history,
//! run a cycle, and save the document if the cycle changed anything. If the
//! save fails the in-memory result is dropped and the error is returned.

use crate::game::{run_cycle, sync_with_catalog, CycleOutcome};
use crate::git::GitHistory;
use crate::models::{Commit, UserState};
use crate::store::ProgressStore;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Result of one update.
#[derive(Debug, Clone)]
pub struct Update {
    /// The document as it is now stored
    pub state: UserState,
    /// `None` when there was nothing new to score
    pub outcome: Option<CycleOutcome>,
}

/// Tracks one user's progress in a store.
pub struct Tracker<S> {
    store: S,
    username: String,
}

impl<S: ProgressStore> Tracker<S> {
    pub fn new(store: S, username: impl Into<String>) -> Self {
        Self {
            store,
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fold an already-read history into the stored document.
    pub fn update_with(&self, history: &[Commit], now: DateTime<Utc>) -> Result<Update> {
        let mut state = self
            .store
            .load(&self.username)
            .with_context(|| format!("Failed to load progress for {}", self.username))?;

        let outcome = run_cycle(&mut state, history, now);
        if outcome.is_some() {
            self.store
                .save(&state)
                .with_context(|| format!("Failed to save progress for {}", self.username))?;
        } else {
            debug!("Nothing to save for {}", self.username);
        }

        Ok(Update { state, outcome })
    }

    /// Read the repository's history and fold it into the stored document.
    pub fn update(&self, repo: &GitHistory) -> Result<Update> {
        let history = repo.all_commits().context("Failed to read commit history")?;
        self.update_with(&history, Utc::now())
    }

    /// The stored document with every catalog achievement present, for display.
    /// Nothing is written.
    pub fn snapshot(&self) -> Result<UserState> {
        let mut state = self
            .store
            .load(&self.username)
            .with_context(|| format!("Failed to load progress for {}", self.username))?;
        sync_with_catalog(&mut state);
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ACHIEVEMENTS;
    use crate::models::{ChangeKind, FileChange};
    use crate::store::{JsonStore, StoreError, StoreResult};
    use chrono::{DateTime, TimeZone};
    use std::cell::Cell;
    use tempfile::tempdir;

    fn commit(id: &str, time: &str) -> Commit {
        Commit {
            id: id.into(),
            message: "work\n".into(),
            committed_at: DateTime::parse_from_rfc3339(time).unwrap(),
            files: vec![FileChange::new("a.rs", ChangeKind::Modified)],
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_720_000_000, 0).unwrap()
    }

    /// Wraps a JsonStore and rejects saves while `fail` is set
    struct FlakyStore {
        inner: JsonStore,
        fail: Cell<bool>,
    }

    impl ProgressStore for FlakyStore {
        fn load(&self, username: &str) -> StoreResult<UserState> {
            self.inner.load(username)
        }

        fn save(&self, state: &UserState) -> StoreResult<()> {
            if self.fail.get() {
                return Err(StoreError::Io {
                    path: self.inner.user_path(&state.username),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.inner.save(state)
        }
    }

    #[test]
    fn test_update_persists_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let tracker = Tracker::new(JsonStore::new(dir.path()), "ada");
        let history = vec![commit("c1", "2024-06-01T12:00:00Z")];

        let first = tracker.update_with(&history, now()).unwrap();
        assert!(first.outcome.is_some());
        assert!(tracker.store().exists("ada"));

        let second = tracker.update_with(&history, now()).unwrap();
        assert!(second.outcome.is_none());
        assert_eq!(second.state, first.state);
        assert_eq!(tracker.store().load("ada").unwrap(), first.state);
    }

    #[test]
    fn test_empty_history_writes_nothing() {
        let dir = tempdir().unwrap();
        let tracker = Tracker::new(JsonStore::new(dir.path()), "ada");
        let update = tracker.update_with(&[], now()).unwrap();
        assert!(update.outcome.is_none());
        assert!(!tracker.store().exists("ada"));
    }

    #[test]
    fn test_failed_save_discards_cycle() {
        let dir = tempdir().unwrap();
        let store = FlakyStore {
            inner: JsonStore::new(dir.path()),
            fail: Cell::new(false),
        };
        let tracker = Tracker::new(store, "ada");
        let c1 = commit("c1", "2024-06-01T12:00:00Z");
        let stored = tracker
            .update_with(std::slice::from_ref(&c1), now())
            .unwrap()
            .state;

        tracker.store().fail.set(true);
        let c2 = commit("c2", "2024-06-02T12:00:00Z");
        let history = vec![c2, c1];
        assert!(tracker.update_with(&history, now()).is_err());

        // Next cycle re-derives from the last durable document
        tracker.store().fail.set(false);
        assert_eq!(tracker.store().load("ada").unwrap(), stored);
        let update = tracker.update_with(&history, now()).unwrap();
        assert_eq!(update.outcome.map(|o| o.new_commits), Some(1));
    }

    #[test]
    fn test_snapshot_lists_whole_catalog_without_writing() {
        let dir = tempdir().unwrap();
        let tracker = Tracker::new(JsonStore::new(dir.path()), "ada");
        let state = tracker.snapshot().unwrap();
        assert_eq!(state.achievements.len(), ACHIEVEMENTS.len());
        assert!(!tracker.store().exists("ada"));
    }
}
