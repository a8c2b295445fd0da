//! Update command - score new commits and award achievements

use super::Session;
use crate::reporters::{render_outcome, OutputFormat};
use anyhow::Result;
use serde_json::json;

/// Run one update cycle and print what changed
pub fn run(session: &Session, format: OutputFormat, emoji: bool) -> Result<()> {
    let update = session.tracker.update(&session.repo)?;
    match format {
        OutputFormat::Text => print!("{}", render_outcome(update.outcome.as_ref(), emoji)),
        OutputFormat::Json => {
            let value = json!({
                "username": update.state.username,
                "updated": update.outcome.is_some(),
                "outcome": update.outcome,
                "user_progress": update.state.user_progress,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}
