//! Git history extraction using libgit2

use crate::models::{ChangeKind, Commit, FileChange};
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use git2::{Delta, ErrorCode, Repository, Sort};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Commit history reader for one repository.
pub struct GitHistory {
    repo: Repository,
}

impl GitHistory {
    /// Open a git repository.
    ///
    /// # Arguments
    /// * `path` - Path to the repository (or any subdirectory)
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)
            .with_context(|| format!("Not a git repository: {}", path.display()))?;
        debug!("Opened git repository at {:?}", repo.path());
        Ok(Self { repo })
    }

    /// Check if a path is inside a git repository.
    pub fn is_git_repo(path: &Path) -> bool {
        Repository::discover(path).is_ok()
    }

    /// Get the repository root path.
    pub fn repo_root(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .context("Repository has no working directory (bare repo?)")
    }

    /// The `.git` directory, watched for new commits
    pub fn git_dir(&self) -> PathBuf {
        self.repo.path().to_path_buf()
    }

    /// Every commit reachable from HEAD, newest first.
    ///
    /// A repository without any commit yet yields an empty history.
    pub fn all_commits(&self) -> Result<Vec<Commit>> {
        match self.repo.head() {
            Ok(_) => {}
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                debug!("HEAD is unborn, no commits yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e).context("Failed to resolve HEAD"),
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push_head()?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;
            commits.push(self.extract_commit(&commit)?);
        }

        debug!("Read {} commits", commits.len());
        Ok(commits)
    }

    /// Convert a git2 commit into the engine's commit model.
    fn extract_commit(&self, commit: &git2::Commit) -> Result<Commit> {
        let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
        let committed_at = commit_time(&commit.time());

        let parent = commit.parent(0).ok();
        let tree = commit.tree()?;
        let parent_tree = parent.as_ref().map(|p| p.tree()).transpose()?;

        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

        // One entry per path; the first delta seen for a path wins
        let mut files: BTreeMap<String, ChangeKind> = BTreeMap::new();
        diff.foreach(
            &mut |delta, _| {
                let path = delta.new_file().path().or_else(|| delta.old_file().path());
                if let Some(path) = path {
                    files
                        .entry(path.to_string_lossy().to_string())
                        .or_insert_with(|| change_kind(delta.status()));
                }
                true
            },
            None,
            None,
            None,
        )?;

        Ok(Commit {
            id: commit.id().to_string(),
            message,
            committed_at,
            files: files
                .into_iter()
                .map(|(path, kind)| FileChange { path, kind })
                .collect(),
        })
    }
}

fn change_kind(status: Delta) -> ChangeKind {
    match status {
        Delta::Added | Delta::Copied => ChangeKind::Added,
        Delta::Modified | Delta::Typechange => ChangeKind::Modified,
        Delta::Deleted => ChangeKind::Deleted,
        Delta::Renamed => ChangeKind::Renamed,
        _ => ChangeKind::Other,
    }
}

/// Convert a git timestamp into a datetime in the recorded offset.
fn commit_time(time: &git2::Time) -> DateTime<FixedOffset> {
    let utc = DateTime::<Utc>::from_timestamp(time.seconds(), 0).unwrap_or_default();
    match FixedOffset::east_opt(time.offset_minutes() * 60) {
        Some(offset) => utc.with_timezone(&offset),
        None => utc.fixed_offset(),
    }
}
