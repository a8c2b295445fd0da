//! Progress and achievement engine
//!
//! Pure, synchronous logic with no I/O. Callers hand in a materialized,
//! newest-first commit history and the user's stored document, and get the
//! updated document back.
//!
//! # Cycle
//!
//! ```text
//! scan(history, checkpoint)      -> commits not yet scored
//! score_commit(c) for each       -> points added to total
//! commits_count, checkpoint      -> updated from the full history
//! evaluate(history, progress)    -> achievements that unlock now (+points)
//! rank_progress(total)           -> current / next rank for display
//! ```
//!
//! Achievement predicates always look at the whole history, never just the
//! new commits: a streak or a burst day can be completed by commits that
//! were scored in different cycles.

pub mod achievements;
pub mod engine;
pub mod ranks;
pub mod scanner;
pub mod scoring;

pub use achievements::{
    evaluate, sync_with_catalog, AchievementDef, Unlock, ACHIEVEMENTS,
};
pub use engine::{run_cycle, CycleOutcome};
pub use ranks::{current_rank, next_rank, rank_progress, RankDef, RankProgress, RANKS};
pub use scanner::{checkpoint_of, find_new_commits, scan, Scan, ScanKind};
pub use scoring::{score_breakdown, score_commit, ScoreBreakdown};
