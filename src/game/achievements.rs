//! Achievement catalog and evaluator
//!
//! The catalog is append-only: ids are stable storage keys and never change
//! meaning, while display names and descriptions may be edited freely.
//! Unlocked state is always looked up by id.

use crate::game::scoring::{is_early, is_late};
use crate::models::{AchievementRecord, ChangeKind, Commit, Progress, UserState};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};

/// A fixed achievement definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub points: u64,
}

/// Every achievement, in evaluation order.
pub const ACHIEVEMENTS: &[AchievementDef] = &[
    // Commit-based
    AchievementDef {
        id: "first_commit",
        name: "First Steps",
        description: "Make your first commit",
        points: 100,
    },
    AchievementDef {
        id: "commit_master",
        name: "Commit Master",
        description: "Make 10 commits",
        points: 500,
    },
    AchievementDef {
        id: "commit_enthusiast",
        name: "Commit Enthusiast",
        description: "Make 5 commits in a single day",
        points: 300,
    },
    AchievementDef {
        id: "commit_streak",
        name: "Commit Streak",
        description: "Make commits for 3 consecutive days",
        points: 400,
    },
    // Code quantity
    AchievementDef {
        id: "code_writer",
        name: "Code Writer",
        description: "Add 1000 lines of code",
        points: 1000,
    },
    AchievementDef {
        id: "code_cleaner",
        name: "Code Cleaner",
        description: "Delete 500 lines of code",
        points: 800,
    },
    AchievementDef {
        id: "file_master",
        name: "File Master",
        description: "Modify 10 different files",
        points: 400,
    },
    // Code quality
    AchievementDef {
        id: "message_pro",
        name: "Message Pro",
        description: "Write a commit message longer than 100 characters",
        points: 200,
    },
    AchievementDef {
        id: "multi_file",
        name: "Multi-File Developer",
        description: "Modify 3 files in a single commit",
        points: 300,
    },
    AchievementDef {
        id: "early_bird",
        name: "Early Bird",
        description: "Make a commit before 9 AM",
        points: 150,
    },
    AchievementDef {
        id: "night_owl",
        name: "Night Owl",
        description: "Make a commit after 9 PM",
        points: 150,
    },
    // Project milestones
    AchievementDef {
        id: "project_starter",
        name: "Project Starter",
        description: "Create a new file in the project",
        points: 100,
    },
    AchievementDef {
        id: "readme_writer",
        name: "README Writer",
        description: "Create or update README.md",
        points: 200,
    },
    AchievementDef {
        id: "dependency_master",
        name: "Dependency Master",
        description: "Update a dependency manifest",
        points: 150,
    },
];

const COMMIT_MASTER_COUNT: u64 = 10;
const BURST_COMMITS_PER_DAY: usize = 5;
const STREAK_DAYS: usize = 3;
const LONG_MESSAGE_CHARS: usize = 100;
const MULTI_FILE_COUNT: usize = 3;
const FILE_MASTER_COUNT: usize = 10;
const CODE_WRITER_LINES: u64 = 1000;
const CODE_CLEANER_LINES: u64 = 500;

/// File names that count as dependency manifests.
const DEPENDENCY_MANIFESTS: &[&str] = &[
    "requirements.txt",
    "Cargo.toml",
    "package.json",
    "go.mod",
    "pyproject.toml",
    "Gemfile",
    "pom.xml",
    "build.gradle",
];

/// Look up a catalog entry by id.
pub fn find(id: &str) -> Option<&'static AchievementDef> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// An achievement that unlocked during an evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unlock {
    pub id: &'static str,
    pub name: &'static str,
    pub points: u64,
}

/// Commit counts per calendar date.
struct DayStats {
    per_day: HashMap<NaiveDate, usize>,
}

impl DayStats {
    fn from_history(history: &[Commit]) -> Self {
        let mut per_day = HashMap::new();
        for c in history {
            *per_day.entry(c.date()).or_insert(0) += 1;
        }
        Self { per_day }
    }

    fn busiest_day(&self) -> usize {
        self.per_day.values().copied().max().unwrap_or(0)
    }

    /// True if some run of `days` consecutive calendar dates all have commits.
    fn has_streak(&self, days: usize) -> bool {
        if days == 0 {
            return true;
        }
        let mut dates: Vec<NaiveDate> = self.per_day.keys().copied().collect();
        dates.sort_unstable();
        dates
            .windows(days)
            .any(|w| w.windows(2).all(|pair| (pair[1] - pair[0]).num_days() == 1))
    }
}

/// Whether the achievement with `id` is earned by `history` and `progress`.
fn is_earned(id: &str, history: &[Commit], progress: &Progress, days: &DayStats) -> bool {
    match id {
        "first_commit" => progress.commits_count >= 1,
        "commit_master" => progress.commits_count >= COMMIT_MASTER_COUNT,
        "commit_enthusiast" => days.busiest_day() >= BURST_COMMITS_PER_DAY,
        "commit_streak" => days.has_streak(STREAK_DAYS),
        "code_writer" => progress.lines_added >= CODE_WRITER_LINES,
        "code_cleaner" => progress.lines_deleted >= CODE_CLEANER_LINES,
        "file_master" => {
            history
                .iter()
                .flat_map(|c| c.files.iter().map(|f| f.path.as_str()))
                .collect::<BTreeSet<_>>()
                .len()
                >= FILE_MASTER_COUNT
        }
        "message_pro" => history.iter().any(|c| c.message_len() > LONG_MESSAGE_CHARS),
        "multi_file" => history.iter().any(|c| c.distinct_files() >= MULTI_FILE_COUNT),
        "early_bird" => history.iter().any(|c| is_early(c.hour())),
        "night_owl" => history.iter().any(|c| is_late(c.hour())),
        "project_starter" => history
            .iter()
            .any(|c| c.files.iter().any(|f| f.kind == ChangeKind::Added)),
        "readme_writer" => history.iter().any(|c| {
            c.files
                .iter()
                .any(|f| f.file_name().eq_ignore_ascii_case("README.md"))
        }),
        "dependency_master" => history.iter().any(|c| {
            c.files
                .iter()
                .any(|f| DEPENDENCY_MANIFESTS.contains(&f.file_name()))
        }),
        other => {
            debug!("No predicate for achievement '{}'", other);
            false
        }
    }
}

/// Evaluate every locked achievement against the full history.
///
/// Achievements already in `unlocked` (by id) are skipped. Each newly earned
/// achievement has its points added to `progress.total_points` before the
/// next one is checked. Returns the new unlocks in catalog order.
pub fn evaluate(
    history: &[Commit],
    progress: &mut Progress,
    unlocked: &BTreeSet<String>,
) -> Vec<Unlock> {
    let days = DayStats::from_history(history);
    let mut unlocks = Vec::new();

    for def in ACHIEVEMENTS {
        if unlocked.contains(def.id) {
            continue;
        }
        if is_earned(def.id, history, progress, &days) {
            progress.total_points += def.points;
            info!("Achievement unlocked: {} (+{})", def.name, def.points);
            unlocks.push(Unlock {
                id: def.id,
                name: def.name,
                points: def.points,
            });
        }
    }

    unlocks
}

/// Reconcile a user's achievement records with the catalog.
///
/// Records without an id (older documents) are matched by display name.
/// Every catalog entry ends up with exactly one record, in catalog order;
/// missing ones are created locked. Locked records pick up the catalog's
/// current text and points. Records unknown to the catalog are dropped.
pub fn sync_with_catalog(state: &mut UserState) {
    let mut by_id: HashMap<String, AchievementRecord> = HashMap::new();

    for mut record in std::mem::take(&mut state.achievements) {
        if record.id.is_empty() {
            match ACHIEVEMENTS.iter().find(|a| a.name == record.name) {
                Some(def) => record.id = def.id.to_string(),
                None => {
                    warn!("Dropping achievement record '{}' with no catalog entry", record.name);
                    continue;
                }
            }
        }
        if find(&record.id).is_none() {
            warn!("Dropping achievement record '{}' with no catalog entry", record.id);
            continue;
        }
        // Keep the unlocked copy if a document somehow holds duplicates
        let keep_existing = by_id.get(&record.id).is_some_and(|r| r.is_unlocked());
        if !keep_existing {
            by_id.insert(record.id.clone(), record);
        }
    }

    state.achievements = ACHIEVEMENTS
        .iter()
        .map(|def| match by_id.remove(def.id) {
            Some(record) if record.is_unlocked() => record,
            _ => AchievementRecord {
                id: def.id.to_string(),
                name: def.name.to_string(),
                description: def.description.to_string(),
                points: def.points,
                unlocked_at: None,
            },
        })
        .collect();
}

/// Stamp the records for `unlocks` as unlocked at `now`.
pub fn mark_unlocked(state: &mut UserState, unlocks: &[Unlock], now: DateTime<Utc>) {
    for unlock in unlocks {
        if let Some(record) = state.achievements.iter_mut().find(|r| r.id == unlock.id) {
            if record.unlocked_at.is_none() {
                record.unlocked_at = Some(now);
            }
        }
    }
}
