//! Text (terminal) reporter with colors and formatting

use super::StatusReport;
use crate::game::{rank_progress, CycleOutcome, ScanKind, RANKS};
use anyhow::Result;
use chrono::Local;
use console::style;
use std::fmt::Write;

const RULE: &str = "──────────────────────────────────────";

fn glyph(emoji: &'static str, enabled: bool) -> String {
    if enabled {
        format!("{} ", emoji)
    } else {
        String::new()
    }
}

/// Truncate to `max` characters, adding "..." when cut
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Render report as formatted terminal output
pub fn render(report: &StatusReport, emoji: bool) -> Result<String> {
    let mut out = String::new();
    let progress = &report.user_progress;

    // Progress panel
    writeln!(out, "\n{}", style("Your Progress").bold())?;
    writeln!(out, "{}", style(RULE).dim())?;
    writeln!(
        out,
        "  Total Points: {}",
        style(progress.total_points).green().bold()
    )?;
    writeln!(
        out,
        "  Current Rank: {}{}",
        glyph(report.current_rank.emoji, emoji),
        style(report.current_rank.name).cyan()
    )?;
    writeln!(out, "  Commits: {}", progress.commits_count)?;
    writeln!(
        out,
        "  Last Updated: {}",
        progress
            .last_updated
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
    )?;

    // Next rank panel
    if let Some(next) = report.next_rank {
        writeln!(out, "\n{}", style("Next Rank").bold())?;
        writeln!(out, "{}", style(RULE).dim())?;
        writeln!(
            out,
            "  Progress to {}{}: {:.1}%",
            glyph(next.emoji, emoji),
            style(next.name).cyan(),
            report.rank_percent
        )?;
        writeln!(out, "  Points needed: {}", report.points_needed)?;
    } else {
        writeln!(
            out,
            "\n  {}",
            style("Top rank reached. Nothing left to climb.").dim()
        )?;
    }

    // Achievements table
    writeln!(
        out,
        "\n{} ({}/{})",
        style("Achievements").bold(),
        report.unlocked_count(),
        report.achievements.len()
    )?;
    writeln!(
        out,
        "{}",
        style(format!(
            "  {:<22}  {:<50}  {:>6}  STATUS",
            "NAME", "DESCRIPTION", "POINTS"
        ))
        .dim()
    )?;
    for a in &report.achievements {
        let status = match (a.is_unlocked(), emoji) {
            (true, true) => style("✅ Unlocked".to_string()).green(),
            (true, false) => style("Unlocked".to_string()).green(),
            (false, true) => style("🔒 Locked".to_string()).dim(),
            (false, false) => style("Locked".to_string()).dim(),
        };
        writeln!(
            out,
            "  {}  {}  {}  {}",
            style(format!("{:<22}", truncate(&a.name, 22))).cyan(),
            style(format!("{:<50}", truncate(&a.description, 50))).magenta(),
            style(format!("{:>6}", a.points)).green(),
            status
        )?;
    }

    Ok(out)
}

/// One-line-per-fact summary of an update cycle
pub fn render_outcome(outcome: Option<&CycleOutcome>, emoji: bool) -> String {
    let Some(outcome) = outcome else {
        return format!("{}\n", style("No new commits since last update.").dim());
    };

    let mut out = String::new();
    if outcome.scan == ScanKind::Rewritten {
        out.push_str(&format!(
            "{}\n",
            style("History was rewritten since the last update; all commits were rescored.")
                .yellow()
        ));
    }
    out.push_str(&format!(
        "Scored {} new commit{}: {}\n",
        outcome.new_commits,
        if outcome.new_commits == 1 { "" } else { "s" },
        style(format!("+{} points", outcome.commit_points)).green()
    ));
    for unlock in &outcome.unlocks {
        out.push_str(&format!(
            "  {}{} {}\n",
            if emoji { "🏅 " } else { "* " },
            style(unlock.name).cyan().bold(),
            style(format!("+{}", unlock.points)).green()
        ));
    }
    let rank = rank_progress(outcome.total_points);
    out.push_str(&format!(
        "Total: {} ({}{})\n",
        style(outcome.total_points).bold(),
        glyph(rank.current.emoji, emoji),
        rank.current.name
    ));
    out
}

/// The rank ladder with the player's position marked
pub fn render_ranks(points: u64, emoji: bool) -> String {
    let current = rank_progress(points).current;
    let mut out = format!("\n{}\n", style("Ranks").bold());
    for rank in RANKS {
        let marker = if rank.id == current.id { ">" } else { " " };
        let line = format!(
            "{} {}{:<12} {:>7}",
            marker,
            glyph(rank.emoji, emoji),
            rank.name,
            rank.points_required
        );
        if rank.id == current.id {
            out.push_str(&format!("{}\n", style(line).cyan().bold()));
        } else {
            out.push_str(&format!("{}\n", line));
        }
    }
    out
}
