//! CLI command definitions and handlers

mod start;
mod status;
mod update;

use crate::config::UserConfig;
use crate::git::GitHistory;
use crate::reporters::OutputFormat;
use crate::store::JsonStore;
use crate::tracker::Tracker;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use std::path::{Path, PathBuf};

/// Parse and validate the poll interval in seconds (1-86400)
fn parse_interval(s: &str) -> Result<u64, String> {
    let n: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("interval must be at least 1 second".to_string())
    } else if n > 86_400 {
        Err("interval cannot exceed one day".to_string())
    } else {
        Ok(n)
    }
}

/// Codegame - points, achievements and ranks for your commits
#[derive(Parser, Debug)]
#[command(name = "codegame")]
#[command(
    version,
    about = "Turn your git history into points, achievements and ranks",
    long_about = "Codegame scores every commit in a repository, unlocks achievements \
for commit streaks, busy days, descriptive messages and late-night hacking, and \
ranks you from Cardboard to Mastermind.\n\n\
Progress is kept per repository and per user in a local JSON document. \
Run without a subcommand to update and show your status.",
    after_help = "\
Examples:
  codegame                          Update and show status for the current repo
  codegame start                    Keep refreshing as you commit
  codegame status --format json     JSON output for scripting
  codegame /path/to/repo update     Score new commits in another repo
  codegame ranks                    Show the rank ladder"
)]
pub struct Cli {
    /// Path to repository (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    /// Player name progress is tracked under (default: config, then $USER)
    #[arg(long, global = true, env = "CODEGAME_USER")]
    pub user: Option<String>,

    /// Directory holding progress documents (default: platform data dir)
    #[arg(long, global = true, env = "CODEGAME_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the repository and refresh status after every commit
    #[command(after_help = "\
Examples:
  codegame start                    Refresh on commit, or every 60s
  codegame start --interval 10      Poll every 10 seconds
  codegame start --no-clear         Append output instead of redrawing")]
    Start {
        /// Seconds between refreshes when no commit is seen (default: config, then 60)
        #[arg(long, short = 'i', value_parser = parse_interval)]
        interval: Option<u64>,

        /// Do not clear the terminal between refreshes
        #[arg(long)]
        no_clear: bool,

        /// Disable emoji in output
        #[arg(long)]
        no_emoji: bool,
    },

    /// Score commits made since the last update
    Update {
        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Disable emoji in output
        #[arg(long)]
        no_emoji: bool,
    },

    /// Show points, rank and achievements without scanning
    Status {
        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Disable emoji in output
        #[arg(long)]
        no_emoji: bool,
    },

    /// Show the rank ladder and where you stand on it
    Ranks {
        /// Disable emoji in output
        #[arg(long)]
        no_emoji: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version info
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Initialize config file with example settings
    Init,
    /// Show current config and paths
    Show,
}

/// Resolved settings shared by every command that touches progress.
pub(crate) struct Session {
    pub repo: GitHistory,
    pub repo_root: PathBuf,
    pub tracker: Tracker<JsonStore>,
    pub config: UserConfig,
}

impl Session {
    /// Open the repository at `cli.path` and the store for the resolved user.
    /// CLI flags take priority over config file and environment.
    pub fn open(cli: &Cli) -> Result<Self> {
        let config = UserConfig::load()?;
        let path = cli
            .path
            .canonicalize()
            .with_context(|| format!("Path does not exist: {}", cli.path.display()))?;
        let repo = GitHistory::open(&path)?;
        let repo_root = repo.repo_root()?.to_path_buf();

        let username = cli.user.clone().unwrap_or_else(|| config.username());
        let data_root = cli.data_dir.clone().unwrap_or_else(|| config.data_root());
        let store = JsonStore::for_repo(&data_root, &repo_root);
        tracing::debug!("Tracking {} in {:?}", username, store.dir());

        Ok(Self {
            repo,
            repo_root,
            tracker: Tracker::new(store, username),
            config,
        })
    }

    /// Emoji on unless disabled by flag or config
    pub fn emoji(&self, no_emoji: bool) -> bool {
        !no_emoji && self.config.emoji()
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Start {
            interval,
            no_clear,
            no_emoji,
        }) => {
            let session = Session::open(&cli)?;
            let interval = interval
                .map(std::time::Duration::from_secs)
                .unwrap_or_else(|| session.config.poll_interval());
            let emoji = session.emoji(*no_emoji);
            start::run(&session, interval, !no_clear, emoji)
        }

        Some(Commands::Update { format, no_emoji }) => {
            let session = Session::open(&cli)?;
            let format: OutputFormat = format.parse()?;
            update::run(&session, format, session.emoji(*no_emoji))
        }

        Some(Commands::Status { format, no_emoji }) => {
            let session = Session::open(&cli)?;
            let format: OutputFormat = format.parse()?;
            status::run(&session, format, session.emoji(*no_emoji))
        }

        Some(Commands::Ranks { no_emoji }) => {
            let session = Session::open(&cli)?;
            let state = session.tracker.snapshot()?;
            print!(
                "{}",
                crate::reporters::render_ranks(
                    state.user_progress.total_points,
                    session.emoji(*no_emoji)
                )
            );
            Ok(())
        }

        Some(Commands::Config { action }) => run_config_action(action, &cli),

        Some(Commands::Version) => {
            println!("codegame {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }

        None => {
            // Check if the path looks like an unknown subcommand
            check_unknown_subcommand(&cli.path)?;
            // Default: update, then show status
            let session = Session::open(&cli)?;
            let emoji = session.emoji(false);
            update::run(&session, OutputFormat::Text, emoji)?;
            status::run(&session, OutputFormat::Text, emoji)
        }
    }
}

/// Check if the path looks like a mistyped subcommand and bail with a helpful message
fn check_unknown_subcommand(path: &Path) -> Result<()> {
    let path_str = path.to_string_lossy();
    let looks_like_command = !path.exists()
        && !path_str.contains('/')
        && !path_str.contains('\\')
        && !path_str.starts_with('.');
    if !looks_like_command {
        return Ok(());
    }
    let known_commands = ["start", "update", "status", "ranks", "config", "version"];
    anyhow::bail!(
        "Unknown command '{}'. Run 'codegame --help' for available commands.\n\nDid you mean one of: {}?",
        path_str,
        known_commands.join(", ")
    )
}

fn run_config_action(action: &ConfigAction, cli: &Cli) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = UserConfig::init_user_config()?;
            println!("✅ Config initialized at: {}", path.display());
            println!("\nOr set via environment:");
            println!("  export CODEGAME_USER=\"ada\"");
            println!("  export CODEGAME_POLL_INTERVAL=30");
            Ok(())
        }
        ConfigAction::Show => show_config(cli),
    }
}

fn show_config(cli: &Cli) -> Result<()> {
    let config = UserConfig::load()?;
    println!("📁 Config paths:");
    if let Some(user_path) = UserConfig::user_config_path() {
        let status = if user_path.exists() {
            style("✓").green().to_string()
        } else {
            style("(not found)").dim().to_string()
        };
        println!("  User:    {} {}", user_path.display(), status);
    }
    println!();

    let username = cli.user.clone().unwrap_or_else(|| config.username());
    let data_root = cli.data_dir.clone().unwrap_or_else(|| config.data_root());
    println!("🎮 Player:        {}", style(&username).cyan());
    println!("  Data dir:      {}", data_root.display());
    if let Ok(repo) = GitHistory::open(&cli.path) {
        if let Ok(root) = repo.repo_root() {
            let store = JsonStore::for_repo(&data_root, root);
            println!("  Progress file: {}", store.user_path(&username).display());
        }
    }
    println!("  Poll interval: {}s", config.poll_interval().as_secs());
    println!("  Emoji:         {}", config.emoji());
    Ok(())
}
