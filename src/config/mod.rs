//! Configuration module for codegame
//!
//! This module handles:
//! - The user config file (`<config_dir>/codegame/config.toml`)
//! - Environment variable overrides
//! - Defaults for the player name, storage location and poll interval

mod user_config;

pub use user_config::{DisplayConfig, PlayerConfig, StorageConfig, UserConfig, WatchConfig};
