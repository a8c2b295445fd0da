//! Commit scanner: which commits have not been scored yet.

use crate::models::Commit;
use serde::Serialize;

/// How the new-commit set was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    /// No checkpoint yet; everything is new
    Bootstrap,
    /// Checkpoint found; only commits newer than it are new
    Incremental,
    /// Checkpoint missing from history (rebase, force-push); everything is
    /// treated as new and may be scored a second time
    Rewritten,
}

/// Result of a scan over a newest-first history.
#[derive(Debug, Clone, Copy)]
pub struct Scan<'a> {
    pub commits: &'a [Commit],
    pub kind: ScanKind,
}

impl Scan<'_> {
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

/// Split `history` (newest first) at the checkpoint.
///
/// An empty checkpoint string counts as no checkpoint.
pub fn scan<'a>(history: &'a [Commit], last_processed: Option<&str>) -> Scan<'a> {
    let Some(last) = last_processed.filter(|id| !id.is_empty()) else {
        return Scan {
            commits: history,
            kind: ScanKind::Bootstrap,
        };
    };

    match history.iter().position(|c| c.id == last) {
        Some(idx) => Scan {
            commits: &history[..idx],
            kind: ScanKind::Incremental,
        },
        None => Scan {
            commits: history,
            kind: ScanKind::Rewritten,
        },
    }
}

/// Commits newer than `last_processed`, newest first.
pub fn find_new_commits<'a>(history: &'a [Commit], last_processed: Option<&str>) -> &'a [Commit] {
    scan(history, last_processed).commits
}

/// The checkpoint to record after a scan: the head of the history.
pub fn checkpoint_of(history: &[Commit]) -> Option<&str> {
    history.first().map(|c| c.id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Commit;
    use chrono::DateTime;

    fn history(n: usize) -> Vec<Commit> {
        (0..n)
            .map(|i| Commit {
                id: format!("c{}", n - i),
                message: "msg".into(),
                committed_at: DateTime::parse_from_rfc3339("2024-01-01T12:00:00Z").unwrap(),
                files: vec![],
            })
            .collect()
    }

    #[test]
    fn test_no_checkpoint_returns_everything() {
        let h = history(4);
        let s = scan(&h, None);
        assert_eq!(s.kind, ScanKind::Bootstrap);
        assert_eq!(s.commits.len(), 4);
        assert_eq!(find_new_commits(&h, Some("")).len(), 4);
    }

    #[test]
    fn test_checkpoint_returns_strictly_newer_prefix() {
        let h = history(5); // c5, c4, c3, c2, c1
        for (nth, commit) in h.iter().enumerate() {
            let new = find_new_commits(&h, Some(&commit.id));
            assert_eq!(new.len(), nth);
            assert!(new.iter().all(|c| c.id != commit.id));
        }
        let s = scan(&h, Some("c3"));
        assert_eq!(s.kind, ScanKind::Incremental);
        let ids: Vec<_> = s.commits.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c5", "c4"]);
    }

    #[test]
    fn test_checkpoint_at_head_is_empty() {
        let h = history(3);
        let s = scan(&h, Some("c3"));
        assert!(s.is_empty());
        assert_eq!(s.kind, ScanKind::Incremental);
    }

    #[test]
    fn test_unknown_checkpoint_falls_back_to_full_rescan() {
        // Rewritten history: the old checkpoint is gone and every commit is
        // handed back, so previously scored commits will be scored again.
        let h = history(3);
        let s = scan(&h, Some("rebased-away"));
        assert_eq!(s.kind, ScanKind::Rewritten);
        assert_eq!(s.commits.len(), 3);
    }

    #[test]
    fn test_empty_history() {
        let h: Vec<Commit> = Vec::new();
        assert!(scan(&h, None).is_empty());
        assert!(scan(&h, Some("c1")).is_empty());
        assert_eq!(checkpoint_of(&h), None);
    }

    #[test]
    fn test_checkpoint_is_history_head() {
        let h = history(3);
        assert_eq!(checkpoint_of(&h), Some("c3"));
    }
}
