//! Rank table and resolver

use serde::Serialize;

/// A rank tier reached by crossing a points threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankDef {
    pub id: &'static str,
    pub name: &'static str,
    pub points_required: u64,
    pub emoji: &'static str,
}

/// Ranks in ascending threshold order. The first entry starts at 0.
pub const RANKS: &[RankDef] = &[
    RankDef { id: "cardboard", name: "Cardboard", points_required: 0, emoji: "📦" },
    RankDef { id: "bronze", name: "Bronze", points_required: 1_000, emoji: "🥉" },
    RankDef { id: "silver", name: "Silver", points_required: 2_500, emoji: "🥈" },
    RankDef { id: "gold", name: "Gold", points_required: 5_000, emoji: "🥇" },
    RankDef { id: "platinum", name: "Platinum", points_required: 10_000, emoji: "💠" },
    RankDef { id: "diamond", name: "Diamond", points_required: 20_000, emoji: "💎" },
    RankDef { id: "champion", name: "Champion", points_required: 35_000, emoji: "🏆" },
    RankDef { id: "wizard", name: "Wizard", points_required: 50_000, emoji: "🧙" },
    RankDef { id: "mastermind", name: "Mastermind", points_required: 75_000, emoji: "🧠" },
];

/// Highest rank whose threshold is at or below `points`.
pub fn current_rank(points: u64) -> &'static RankDef {
    RANKS
        .iter()
        .rev()
        .find(|r| r.points_required <= points)
        .unwrap_or(&RANKS[0])
}

/// Lowest rank whose threshold is above `points`, if any.
pub fn next_rank(points: u64) -> Option<&'static RankDef> {
    RANKS.iter().find(|r| r.points_required > points)
}

/// Where a point total sits between its current and next rank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankProgress {
    pub current: &'static RankDef,
    pub next: Option<&'static RankDef>,
    /// Points still missing for `next`, 0 at the top rank
    pub points_needed: u64,
    /// 0.0..=100.0 through the current tier
    pub percent: f64,
}

pub fn rank_progress(points: u64) -> RankProgress {
    let current = current_rank(points);
    let next = next_rank(points);

    let (points_needed, percent) = match next {
        Some(next) => {
            let span = next.points_required - current.points_required;
            let earned = points - current.points_required;
            let percent = if span > 0 {
                earned as f64 / span as f64 * 100.0
            } else {
                100.0
            };
            (next.points_required - points, percent)
        }
        None => (0, 100.0),
    };

    RankProgress {
        current,
        next,
        points_needed,
        percent,
    }
}
