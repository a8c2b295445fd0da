//! Core data models for codegame
//!
//! These models are shared by the scoring engine, the git reader and the
//! persistence layer. The serialized field names of [`UserState`] and its
//! children are the on-disk document format and must stay stable.

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Current version of the per-user document.
pub const DOCUMENT_VERSION: u32 = 1;

/// How a commit touched a file, relative to its first parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    #[default]
    Modified,
    Deleted,
    Renamed,
    Other,
}

/// A single path changed by a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    #[serde(default)]
    pub kind: ChangeKind,
}

impl FileChange {
    pub fn new(path: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Final path component, used for name-based milestones like README.md
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// A commit as read from version control. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    /// Full object id
    pub id: String,
    /// Full commit message, including any trailing newline
    pub message: String,
    /// Commit time in the committer's recorded time zone
    pub committed_at: DateTime<FixedOffset>,
    /// Changed files, one entry per distinct path
    pub files: Vec<FileChange>,
}

impl Commit {
    /// Message length in characters
    pub fn message_len(&self) -> usize {
        self.message.chars().count()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Number of distinct paths touched
    pub fn distinct_files(&self) -> usize {
        self.files
            .iter()
            .map(|f| f.path.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Hour of day (0-23) in the committer's time zone
    pub fn hour(&self) -> u32 {
        self.committed_at.hour()
    }

    /// Calendar date in the committer's time zone
    pub fn date(&self) -> NaiveDate {
        self.committed_at.date_naive()
    }

    pub fn short_id(&self) -> &str {
        self.id.get(..12).unwrap_or(&self.id)
    }
}

/// Cumulative progress for one tracked user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(default)]
    pub total_points: u64,
    #[serde(default)]
    pub commits_count: u64,
    /// Not derived from diff data; kept at zero
    #[serde(default)]
    pub lines_added: u64,
    /// Not derived from diff data; kept at zero
    #[serde(default)]
    pub lines_deleted: u64,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
    /// Id of the newest commit folded into the totals, `None` before the first scan
    #[serde(default)]
    pub last_processed_commit: Option<String>,
}

impl Progress {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            total_points: 0,
            commits_count: 0,
            lines_added: 0,
            lines_deleted: 0,
            last_updated: now,
            last_processed_commit: None,
        }
    }

    /// Checkpoint with empty strings treated as absent
    pub fn checkpoint(&self) -> Option<&str> {
        self.last_processed_commit
            .as_deref()
            .filter(|id| !id.is_empty())
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

/// Persisted state of one catalog achievement for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementRecord {
    /// Stable catalog id. Empty on documents written before ids existed.
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub points: u64,
    #[serde(default)]
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl AchievementRecord {
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }
}

/// The per-user document: progress plus every achievement record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    #[serde(default = "default_version")]
    pub version: u32,
    pub username: String,
    #[serde(default)]
    pub achievements: Vec<AchievementRecord>,
    #[serde(default)]
    pub user_progress: Progress,
}

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

impl UserState {
    /// Fresh document with zero progress and no records
    pub fn new(username: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            username: username.into(),
            achievements: Vec::new(),
            user_progress: Progress::new(now),
        }
    }

    /// Ids of every unlocked achievement
    pub fn unlocked_ids(&self) -> BTreeSet<String> {
        self.achievements
            .iter()
            .filter(|a| a.is_unlocked())
            .map(|a| a.id.clone())
            .collect()
    }

    pub fn record(&self, id: &str) -> Option<&AchievementRecord> {
        self.achievements.iter().find(|a| a.id == id)
    }
}
