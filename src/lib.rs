//! Codegame - gamified progress tracking for git repositories
//!
//! Scores each new commit, keeps a per-user running total, unlocks
//! achievements from the whole history and resolves a rank from the total.
//! The [`game`] module is pure; [`tracker`] adds persistence around it and
//! [`git`] supplies the history.

pub mod cli;
pub mod config;
pub mod game;
pub mod git;
pub mod models;
pub mod reporters;
pub mod store;
pub mod tracker;
