//! User-level configuration for codegame
//!
//! Supports loading config from:
//! - Environment variables
//! - ~/.config/codegame/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default seconds between polls in `codegame start`
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UserConfig {
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// Name progress is tracked under (default: $USER)
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Root directory for progress documents
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WatchConfig {
    /// Seconds between polls in `start`
    pub poll_interval_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Show emoji in text output (default: true)
    pub emoji: Option<bool>,
}

impl UserConfig {
    /// Load config from all sources, with priority:
    /// 1. Environment variables (highest)
    /// 2. User config (~/.config/codegame/config.toml)
    pub fn load() -> Result<Self> {
        let mut config = UserConfig::default();

        // Load user config
        if let Some(user_config) = Self::user_config_path()
            .filter(|p| p.exists())
            .and_then(|p| std::fs::read_to_string(&p).ok())
            .and_then(|content| match toml::from_str::<UserConfig>(&content) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    tracing::warn!("Ignoring invalid config file: {}", e);
                    None
                }
            })
        {
            config.merge(user_config);
        }

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("codegame").join("config.toml"))
    }

    /// Merge another config into this one (other takes priority)
    fn merge(&mut self, other: UserConfig) {
        if other.player.name.is_some() {
            self.player.name = other.player.name;
        }
        if other.storage.data_dir.is_some() {
            self.storage.data_dir = other.storage.data_dir;
        }
        if other.watch.poll_interval_secs.is_some() {
            self.watch.poll_interval_secs = other.watch.poll_interval_secs;
        }
        if other.display.emoji.is_some() {
            self.display.emoji = other.display.emoji;
        }
    }

    /// Environment variables override the file
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(name) = var("CODEGAME_USER").filter(|v| !v.is_empty()) {
            self.player.name = Some(name);
        }
        if let Some(dir) = var("CODEGAME_DATA_DIR").filter(|v| !v.is_empty()) {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
        match var("CODEGAME_POLL_INTERVAL").map(|v| v.parse::<u64>()) {
            Some(Ok(secs)) => self.watch.poll_interval_secs = Some(secs),
            Some(Err(e)) => tracing::warn!("Ignoring CODEGAME_POLL_INTERVAL: {}", e),
            None => {}
        }
    }

    /// Player name: config, then $USER / $USERNAME, then "player"
    pub fn username(&self) -> String {
        self.player
            .name
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "player".to_string())
    }

    /// Root directory for progress documents
    pub fn data_root(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(crate::store::data_root)
    }

    /// Poll interval, never below one second
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(
            self.watch
                .poll_interval_secs
                .unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
                .max(1),
        )
    }

    pub fn emoji(&self) -> bool {
        self.display.emoji.unwrap_or(true)
    }

    /// Initialize user config directory and create example config
    pub fn init_user_config() -> Result<PathBuf> {
        let config_path = Self::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if !config_path.exists() {
            let example = r#"# codegame user configuration

[player]
# Name your progress is tracked under (default: $USER)
# name = "ada"

[storage]
# Where progress documents are kept (default: platform data dir)
# data_dir = "/home/ada/.local/share/codegame"

[watch]
# Seconds between refreshes in `codegame start`
# poll_interval_secs = 60

[display]
# Set to false for plain output in terminals without emoji
# emoji = true
"#;
            std::fs::write(&config_path, example)?;
        }

        Ok(config_path)
    }
}
