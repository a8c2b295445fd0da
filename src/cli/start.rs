//! `codegame start` - keep status live while you work
//!
//! Runs an update, redraws the status, then sleeps until either the poll
//! interval elapses or git moves a ref. A failed cycle is reported and the
//! loop carries on from whatever was last saved.

use super::{status, Session};
use crate::reporters::{render_outcome, OutputFormat};
use anyhow::Result;
use console::{style, Term};
use notify::RecursiveMode;
use notify_debouncer_full::{new_debouncer, DebounceEventResult};
use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;
use tracing::{debug, warn};

/// Whether a changed path under `.git` can mean a new commit
fn is_ref_change(path: &Path) -> bool {
    if path.extension().is_some_and(|e| e == "lock") {
        return false;
    }
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    matches!(name, "HEAD" | "ORIG_HEAD" | "packed-refs")
        || path.components().any(|c| c.as_os_str() == "refs")
}

pub fn run(session: &Session, interval: Duration, clear: bool, emoji: bool) -> Result<()> {
    let git_dir = session.repo.git_dir();
    let (tx, rx) = mpsc::channel();

    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        None,
        move |result: DebounceEventResult| match result {
            Ok(events) => {
                if events
                    .iter()
                    .flat_map(|event| event.paths.iter())
                    .any(|p| is_ref_change(p))
                {
                    let _ = tx.send(());
                }
            }
            Err(errors) => {
                for e in errors {
                    warn!("Watch error: {}", e);
                }
            }
        },
    )?;

    // Polling still works if the watcher cannot be installed
    if let Err(e) = debouncer.watch(&git_dir, RecursiveMode::Recursive) {
        warn!("Could not watch {:?}, polling only: {}", git_dir, e);
    }

    let term = Term::stdout();
    loop {
        if clear {
            let _ = term.clear_screen();
        }
        println!(
            "{}Tracking {} as {}",
            if emoji { "🎮 " } else { "" },
            style(session.repo_root.display()).cyan(),
            style(session.tracker.username()).cyan()
        );

        match session.tracker.update(&session.repo) {
            Ok(update) => print!("{}", render_outcome(update.outcome.as_ref(), emoji)),
            Err(e) => eprintln!("{} {:#}", style("Update failed:").red(), e),
        }
        if let Err(e) = status::run(session, OutputFormat::Text, emoji) {
            eprintln!("{} {:#}", style("Could not show status:").red(), e);
        }
        println!(
            "{}",
            style(format!(
                "Refreshing on commit or every {}s. Press Ctrl+C to stop.",
                interval.as_secs()
            ))
            .dim()
        );

        match rx.recv_timeout(interval) {
            Ok(()) => {
                debug!("Ref change detected");
                // Collapse a burst of ref updates into one cycle
                while rx.try_recv().is_ok() {}
            }
            Err(RecvTimeoutError::Timeout) => debug!("Poll interval elapsed"),
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_changes_trigger_refresh() {
        assert!(is_ref_change(Path::new("/r/.git/HEAD")));
        assert!(is_ref_change(Path::new("/r/.git/refs/heads/main")));
        assert!(is_ref_change(Path::new("/r/.git/packed-refs")));
    }

    #[test]
    fn test_other_git_writes_ignored() {
        assert!(!is_ref_change(Path::new("/r/.git/index")));
        assert!(!is_ref_change(Path::new("/r/.git/refs/heads/main.lock")));
        assert!(!is_ref_change(Path::new("/r/.git/objects/ab/cdef")));
    }
}
