//! Status command - show points, rank and achievements

use super::Session;
use crate::reporters::{self, OutputFormat, StatusReport};
use anyhow::Result;

/// Run the status command. Reads the stored document only; nothing is scanned.
pub fn run(session: &Session, format: OutputFormat, emoji: bool) -> Result<()> {
    let state = session.tracker.snapshot()?;
    let report = StatusReport::from_state(&state);
    println!("{}", reporters::report(&report, format, emoji)?);
    Ok(())
}
