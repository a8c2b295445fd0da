//! Output reporters for progress status
//!
//! Supports two output formats:
//! - `text` - Terminal panels and an achievements table
//! - `json` - The user document plus resolved ranks, for scripting

mod json;
mod text;

pub use text::{render_outcome, render_ranks};

use crate::game::{rank_progress, RankDef};
use crate::models::{AchievementRecord, Progress, UserState};
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Everything shown by `codegame status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub username: String,
    pub achievements: Vec<AchievementRecord>,
    pub user_progress: Progress,
    pub current_rank: &'static RankDef,
    pub next_rank: Option<&'static RankDef>,
    pub points_needed: u64,
    pub rank_percent: f64,
}

impl StatusReport {
    pub fn from_state(state: &UserState) -> Self {
        let rank = rank_progress(state.user_progress.total_points);
        Self {
            username: state.username.clone(),
            achievements: state.achievements.clone(),
            user_progress: state.user_progress.clone(),
            current_rank: rank.current,
            next_rank: rank.next,
            points_needed: rank.points_needed,
            rank_percent: rank.percent,
        }
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.is_unlocked()).count()
    }
}

/// Render a status report in the given format
pub fn report(report: &StatusReport, format: OutputFormat, emoji: bool) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report, emoji),
        OutputFormat::Json => json::render(report),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::game::sync_with_catalog;
    use chrono::{TimeZone, Utc};

    /// A report for a user with 852 points and two unlocks
    pub(crate) fn test_report() -> StatusReport {
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut state = UserState::new("ada", at);
        sync_with_catalog(&mut state);
        state.user_progress.total_points = 852;
        state.user_progress.commits_count = 1;
        state.user_progress.last_processed_commit = Some("c0ffee".into());
        for id in ["first_commit", "night_owl"] {
            if let Some(r) = state.achievements.iter_mut().find(|r| r.id == id) {
                r.unlocked_at = Some(at);
            }
        }
        StatusReport::from_state(&state)
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("sarif").is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_report_resolves_ranks() {
        let r = test_report();
        assert_eq!(r.current_rank.name, "Cardboard");
        assert_eq!(r.next_rank.map(|n| n.name), Some("Bronze"));
        assert_eq!(r.points_needed, 148);
        assert_eq!(r.unlocked_count(), 2);
    }
}
