//! Storage path utilities - one directory per repository under the user data dir
//!
//! `~/.local/share/codegame/<repo-name>-<hash>/` on Linux,
//! `%APPDATA%/codegame/<repo-name>-<hash>/` on Windows.

use std::path::{Path, PathBuf};

/// Base directory holding every tracked repository.
pub fn data_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| {
            // Fallback to ~/.local/share
            dirs::home_dir()
                .map(|h| h.join(".local").join("share"))
                .unwrap_or_else(|| PathBuf::from("."))
        })
        .join("codegame")
}

/// Directory holding the user documents for one repository.
pub fn repo_data_dir(root: &Path, repo_path: &Path) -> PathBuf {
    root.join(hash_path(repo_path))
}

/// File name for a user's document. Path separators and other unsafe
/// characters are replaced so every username maps inside the data dir.
pub fn user_file_name(username: &str) -> String {
    let safe: String = username
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let safe = safe.trim_start_matches('.');
    if safe.is_empty() {
        "_.json".to_string()
    } else {
        format!("{}.json", safe)
    }
}

/// Hash a path to create a unique but deterministic directory name.
/// Uses the canonical path to ensure consistency.
fn hash_path(path: &Path) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let path_str = canonical.to_string_lossy();

    let mut hasher = DefaultHasher::new();
    path_str.hash(&mut hasher);
    let hash = hasher.finish();

    // Use canonical path's file_name for consistent naming (important when path is ".")
    let repo_name = canonical
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("repo")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .take(20)
        .collect::<String>();

    format!("{}-{:012x}", repo_name, hash)
}
