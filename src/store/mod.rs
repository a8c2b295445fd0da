//! Persistence for per-user documents
//!
//! The engine never touches storage; the tracker loads a [`UserState`]
//! through a [`ProgressStore`], runs a cycle, and saves it back. A failed
//! save discards that cycle: the next one starts again from whatever was
//! last written successfully.

pub mod paths;

pub use paths::{data_root, repo_data_dir, user_file_name};

use crate::models::{UserState, DOCUMENT_VERSION};
use chrono::Utc;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading or saving a user document
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt document {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Document {path} has version {found}, newer than supported {supported}")]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        supported: u32,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Loads and saves one document per user.
pub trait ProgressStore {
    /// Load a user's document, or a fresh one if none exists yet
    fn load(&self, username: &str) -> StoreResult<UserState>;

    /// Durably replace the user's document
    fn save(&self, state: &UserState) -> StoreResult<()>;
}

/// One pretty-printed JSON file per user inside a directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store for `repo_path` under the given data root
    pub fn for_repo(root: &Path, repo_path: &Path) -> Self {
        Self::new(repo_data_dir(root, repo_path))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn user_path(&self, username: &str) -> PathBuf {
        self.dir.join(user_file_name(username))
    }

    /// Whether a document has been written for this user
    pub fn exists(&self, username: &str) -> bool {
        self.user_path(username).exists()
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl ProgressStore for JsonStore {
    fn load(&self, username: &str) -> StoreResult<UserState> {
        let path = self.user_path(username);
        if !path.exists() {
            debug!("No document at {:?}, starting fresh", path);
            return Ok(UserState::new(username, Utc::now()));
        }

        let file = File::open(&path).map_err(io_err(&path))?;
        let state: UserState =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?;

        if state.version > DOCUMENT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                path,
                found: state.version,
                supported: DOCUMENT_VERSION,
            });
        }

        debug!("Loaded document for {} from {:?}", username, path);
        Ok(state)
    }

    fn save(&self, state: &UserState) -> StoreResult<()> {
        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;
        let path = self.user_path(&state.username);

        // Write to temp file first, then rename (atomic on POSIX)
        let tmp_path = path.with_extension("json.tmp");
        let file = File::create(&tmp_path).map_err(io_err(&tmp_path))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, state)?;
        writer.flush().map_err(io_err(&tmp_path))?;
        drop(writer);

        fs::rename(&tmp_path, &path).map_err(io_err(&path))?;
        debug!("Saved document for {} to {:?}", state.username, path);
        Ok(())
    }
}
