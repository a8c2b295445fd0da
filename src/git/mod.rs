//! Git history access
//!
//! Reads the commit history of a repository with libgit2 and converts each
//! commit into a [`crate::models::Commit`]: full message, committer time in
//! the committer's own offset, and the files changed against the first
//! parent.
//!
//! # Example
//!
//! ```no_run
//! use codegame::git::GitHistory;
//! use std::path::Path;
//!
//! let history = GitHistory::open(Path::new("/path/to/repo")).unwrap();
//! let commits = history.all_commits().unwrap();
//! println!("{} commits, newest first", commits.len());
//! ```

pub mod history;

pub use history::GitHistory;
