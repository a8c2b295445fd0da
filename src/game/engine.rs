//! One scan cycle over a user's document.

use crate::game::achievements::{evaluate, mark_unlocked, sync_with_catalog, Unlock};
use crate::game::scanner::{checkpoint_of, scan, ScanKind};
use crate::game::scoring::score_commit;
use crate::models::{Commit, UserState};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

/// What a cycle changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleOutcome {
    pub scan: ScanKind,
    /// Commits scored this cycle
    pub new_commits: usize,
    /// Points from scoring those commits, before achievement awards
    pub commit_points: u64,
    pub unlocks: Vec<Unlock>,
    pub total_points: u64,
    pub checkpoint: Option<String>,
}

impl CycleOutcome {
    pub fn achievement_points(&self) -> u64 {
        self.unlocks.iter().map(|u| u.points).sum()
    }
}

/// Fold a newest-first `history` into `state`.
///
/// Returns `None` and leaves `state` untouched when there is nothing new
/// since the checkpoint. Otherwise scores the new commits, moves the
/// checkpoint to the head of `history`, and re-evaluates every locked
/// achievement against the whole history.
///
/// If the checkpoint is no longer in `history` the whole history is scored
/// again, which can award points twice for commits that survived a rewrite.
pub fn run_cycle(
    state: &mut UserState,
    history: &[Commit],
    now: DateTime<Utc>,
) -> Option<CycleOutcome> {
    let found = scan(history, state.user_progress.checkpoint());
    if found.is_empty() {
        debug!("No new commits for {}", state.username);
        return None;
    }

    if found.kind == ScanKind::Rewritten {
        warn!(
            "Checkpoint {} not found in history; rescoring all {} commits",
            state.user_progress.checkpoint().unwrap_or_default(),
            history.len()
        );
    }

    let commit_points: u64 = found.commits.iter().map(score_commit).sum();
    let new_commits = found.commits.len();
    let kind = found.kind;

    let progress = &mut state.user_progress;
    progress.total_points += commit_points;
    progress.commits_count = history.len() as u64;
    progress.last_processed_commit = checkpoint_of(history).map(str::to_string);
    progress.last_updated = now;
    info!(
        "Scored {} new commit(s) for {}: +{} points",
        new_commits, state.username, commit_points
    );

    sync_with_catalog(state);
    let unlocked = state.unlocked_ids();
    let unlocks = evaluate(history, &mut state.user_progress, &unlocked);
    mark_unlocked(state, &unlocks, now);

    Some(CycleOutcome {
        scan: kind,
        new_commits,
        commit_points,
        unlocks,
        total_points: state.user_progress.total_points,
        checkpoint: state.user_progress.last_processed_commit.clone(),
    })
}
