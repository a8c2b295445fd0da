//! Commit scoring
//!
//! # Formula
//!
//! ```text
//! score = 50                                  base
//!       + min(message_chars / 10, 50)         message length
//!       + 5 × changed_files                   uncapped
//!       + 20 if hour < 9 or hour >= 21        time of day
//! ```
//!
//! Hours are read in the committer's own time zone. The constants are fixed.

use crate::models::Commit;
use serde::Serialize;

pub const BASE_POINTS: u64 = 50;
pub const MESSAGE_CHARS_PER_POINT: u64 = 10;
pub const MESSAGE_BONUS_CAP: u64 = 50;
pub const POINTS_PER_FILE: u64 = 5;
pub const OFF_HOURS_BONUS: u64 = 20;
/// Commits before this hour count as early
pub const EARLY_BEFORE_HOUR: u32 = 9;
/// Commits at or after this hour count as late
pub const LATE_FROM_HOUR: u32 = 21;

/// Itemised score for one commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScoreBreakdown {
    pub base: u64,
    pub message: u64,
    pub files: u64,
    pub time_of_day: u64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u64 {
        self.base + self.message + self.files + self.time_of_day
    }
}

pub fn is_early(hour: u32) -> bool {
    hour < EARLY_BEFORE_HOUR
}

pub fn is_late(hour: u32) -> bool {
    hour >= LATE_FROM_HOUR
}

pub fn score_breakdown(commit: &Commit) -> ScoreBreakdown {
    let message = (commit.message_len() as u64 / MESSAGE_CHARS_PER_POINT).min(MESSAGE_BONUS_CAP);
    let files = commit.file_count() as u64 * POINTS_PER_FILE;

    let hour = commit.hour();
    let time_of_day = if is_early(hour) || is_late(hour) {
        OFF_HOURS_BONUS
    } else {
        0
    };

    ScoreBreakdown {
        base: BASE_POINTS,
        message,
        files,
        time_of_day,
    }
}

/// Points for a single commit. Pure and deterministic.
pub fn score_commit(commit: &Commit) -> u64 {
    score_breakdown(commit).total()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChangeKind, FileChange};
    use chrono::DateTime;

    fn commit(message_len: usize, files: usize, time: &str) -> Commit {
        Commit {
            id: "abc".into(),
            message: "x".repeat(message_len),
            committed_at: DateTime::parse_from_rfc3339(time).unwrap(),
            files: (0..files)
                .map(|i| FileChange::new(format!("f{i}.rs"), ChangeKind::Modified))
                .collect(),
        }
    }

    #[test]
    fn test_base_only() {
        assert_eq!(score_commit(&commit(0, 0, "2024-05-01T12:00:00Z")), 50);
    }

    #[test]
    fn test_message_bonus_floors_and_caps() {
        assert_eq!(score_breakdown(&commit(9, 0, "2024-05-01T12:00:00Z")).message, 0);
        assert_eq!(score_breakdown(&commit(19, 0, "2024-05-01T12:00:00Z")).message, 1);
        assert_eq!(score_breakdown(&commit(499, 0, "2024-05-01T12:00:00Z")).message, 49);
        assert_eq!(score_breakdown(&commit(500, 0, "2024-05-01T12:00:00Z")).message, 50);
        assert_eq!(score_breakdown(&commit(100_000, 0, "2024-05-01T12:00:00Z")).message, 50);
    }

    #[test]
    fn test_file_bonus_uncapped() {
        assert_eq!(score_breakdown(&commit(0, 200, "2024-05-01T12:00:00Z")).files, 1000);
    }

    #[test]
    fn test_time_of_day_boundaries() {
        let bonus = |t: &str| score_breakdown(&commit(0, 0, t)).time_of_day;
        assert_eq!(bonus("2024-05-01T00:00:00Z"), 20);
        assert_eq!(bonus("2024-05-01T08:59:59Z"), 20);
        assert_eq!(bonus("2024-05-01T09:00:00Z"), 0);
        assert_eq!(bonus("2024-05-01T20:59:59Z"), 0);
        assert_eq!(bonus("2024-05-01T21:00:00Z"), 20);
        assert_eq!(bonus("2024-05-01T23:59:59Z"), 20);
    }

    #[test]
    fn test_hour_uses_committer_zone() {
        // 01:00 UTC, but daytime for the committer
        let c = commit(0, 0, "2024-05-01T10:00:00+09:00");
        assert_eq!(score_breakdown(&c).time_of_day, 0);
    }

    #[test]
    fn test_long_message_many_files_late() {
        // 120 chars -> 12, 4 files -> 20, 22:00 -> 20
        let c = commit(120, 4, "2024-05-01T22:00:00Z");
        let b = score_breakdown(&c);
        assert_eq!(
            b,
            ScoreBreakdown {
                base: 50,
                message: 12,
                files: 20,
                time_of_day: 20
            }
        );
        assert_eq!(score_commit(&c), 102);
    }

    #[test]
    fn test_deterministic() {
        let c = commit(77, 3, "2024-05-01T06:15:00Z");
        assert_eq!(score_commit(&c), score_commit(&c.clone()));
    }
}
