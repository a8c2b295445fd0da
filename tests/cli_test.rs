//! CLI contract tests
//!
//! Runs the compiled binary against temporary repositories. Config lookup
//! is pointed at an empty directory and progress goes to a per-test data dir.

use git2::{Repository, Signature, Time};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn codegame_bin() -> String {
    env!("CARGO_BIN_EXE_codegame").to_string()
}

struct Fixture {
    repo_dir: TempDir,
    data_dir: TempDir,
    config_home: TempDir,
}

fn setup_test_repo(commits: &[(&str, i64)]) -> Fixture {
    let repo_dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(repo_dir.path()).unwrap();
    for (i, (message, secs)) in commits.iter().enumerate() {
        let name = format!("file{}.txt", i);
        std::fs::write(repo_dir.path().join(&name), message).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(&name)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = Signature::new("Test User", "test@example.com", &Time::new(*secs, 0)).unwrap();
        let parents: Vec<git2::Commit> = match repo.head() {
            Ok(head) => vec![head.peel_to_commit().unwrap()],
            Err(_) => vec![],
        };
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap();
    }
    Fixture {
        repo_dir,
        data_dir: tempfile::tempdir().unwrap(),
        config_home: tempfile::tempdir().unwrap(),
    }
}

fn run(fixture: &Fixture, args: &[&str]) -> Output {
    Command::new(codegame_bin())
        .arg(fixture.repo_dir.path())
        .args(args)
        .arg("--user")
        .arg("ada")
        .arg("--data-dir")
        .arg(fixture.data_dir.path())
        .env("XDG_CONFIG_HOME", fixture.config_home.path())
        .env("HOME", fixture.config_home.path())
        .env_remove("RUST_LOG")
        .env_remove("CODEGAME_USER")
        .env_remove("CODEGAME_DATA_DIR")
        .env_remove("CODEGAME_POLL_INTERVAL")
        .output()
        .expect("Failed to run codegame")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn status_json(fixture: &Fixture) -> serde_json::Value {
    let output = run(fixture, &["status", "--format", "json"]);
    assert!(output.status.success(), "status failed: {:?}", output);
    serde_json::from_str(&stdout(&output)).expect("Invalid JSON")
}

// 2024-03-01 12:00 UTC, then one commit per following day
const NOON: i64 = 1_709_294_400;
const DAY: i64 = 86_400;

#[test]
fn test_status_before_any_update() {
    let fixture = setup_test_repo(&[("Initial commit", NOON)]);
    let json = status_json(&fixture);
    assert_eq!(json["username"], "ada");
    assert_eq!(json["user_progress"]["total_points"], 0);
    assert_eq!(json["current_rank"]["name"], "Cardboard");
    let achievements = json["achievements"].as_array().unwrap();
    assert_eq!(achievements.len(), 14);
    assert!(achievements.iter().all(|a| a["unlocked_at"].is_null()));
}

#[test]
fn test_update_then_status() {
    let fixture = setup_test_repo(&[
        ("Initial commit", NOON),
        ("Second day", NOON + DAY),
        ("Third day", NOON + 2 * DAY),
    ]);

    let output = run(&fixture, &["update", "--no-emoji"]);
    assert!(output.status.success(), "update failed: {:?}", output);
    let text = stdout(&output);
    assert!(text.contains("Scored 3 new commits"), "got: {}", text);
    assert!(text.contains("Commit Streak"));

    let json = status_json(&fixture);
    // 56 + 56 + 55 commit points + first_commit 100 + commit_streak 400 + project_starter 100
    assert_eq!(json["user_progress"]["total_points"], 767);
    assert_eq!(json["user_progress"]["commits_count"], 3);
    let unlocked: Vec<&str> = json["achievements"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|a| !a["unlocked_at"].is_null())
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(unlocked, vec!["first_commit", "commit_streak", "project_starter"]);

    // A second update finds nothing new
    let output = run(&fixture, &["update", "--format", "json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["updated"], false);
    assert_eq!(value["user_progress"]["total_points"], 767);
}

#[test]
fn test_json_stdout_is_clean_with_logging() {
    let fixture = setup_test_repo(&[("Initial commit", NOON)]);
    let output = run(&fixture, &["update", "--format", "json", "--log-level", "debug"]);
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("logs must not reach stdout");
    assert_eq!(value["updated"], true);
}

#[test]
fn test_ranks_lists_ladder() {
    let fixture = setup_test_repo(&[("Initial commit", NOON)]);
    let output = run(&fixture, &["ranks", "--no-emoji"]);
    assert!(output.status.success());
    let text = stdout(&output);
    for name in ["Cardboard", "Bronze", "Gold", "Mastermind"] {
        assert!(text.contains(name), "missing {}", name);
    }
}

#[test]
fn test_not_a_repository_fails() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = tempfile::tempdir().unwrap();
    let output = Command::new(codegame_bin())
        .arg(dir.path())
        .args(["status", "--data-dir"])
        .arg(data_dir.path())
        .env("XDG_CONFIG_HOME", data_dir.path())
        .output()
        .expect("Failed to run codegame");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Not a git repository"));
}

#[test]
fn test_version() {
    let output = Command::new(codegame_bin())
        .arg("version")
        .output()
        .expect("Failed to run codegame");
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("codegame "));
}
