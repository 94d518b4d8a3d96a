//! E2E tests for the chatline binary.
//!
//! Covers the CLI surface and exit-code convention:
//! - quickstart when no action is given
//! - history management actions against an isolated data directory
//! - ask failures leaving the history untouched

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command with an isolated data directory and no ambient credentials.
fn chatline_cmd(data_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("chatline").expect("binary");
    cmd.env("XDG_DATA_HOME", data_home.path())
        .env("XDG_CONFIG_HOME", data_home.path())
        .env("XDG_CACHE_HOME", data_home.path())
        .env_remove("OPENAI_API_KEY")
        .env_remove("CHATLINE_API_BASE")
        .env_remove("CHATLINE_MODEL")
        .env("NO_COLOR", "1");
    cmd
}

fn message_count(data_home: &TempDir) -> i64 {
    let db = data_home.path().join("chatline/history.sqlite");
    if !db.exists() {
        return 0;
    }
    let conn = rusqlite::Connection::open(db).expect("open db");
    conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))
        .expect("count")
}

#[test]
fn no_arguments_prints_quickstart() {
    let temp = TempDir::new().expect("temp dir");

    chatline_cmd(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("QUICK START"));
}

#[test]
fn view_empty_history_succeeds_with_message() {
    let temp = TempDir::new().expect("temp dir");

    chatline_cmd(&temp)
        .arg("--view-history")
        .assert()
        .success()
        .stdout(predicate::str::contains("History is empty."));
}

#[test]
fn last_message_on_empty_history_fails_with_exit_2() {
    let temp = TempDir::new().expect("temp dir");

    chatline_cmd(&temp)
        .arg("-lm")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no messages"));
}

#[test]
fn delete_last_on_empty_history_fails_with_exit_2() {
    let temp = TempDir::new().expect("temp dir");

    chatline_cmd(&temp)
        .arg("-dm")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no messages"));
}

#[test]
fn clear_empty_history_succeeds() {
    let temp = TempDir::new().expect("temp dir");

    chatline_cmd(&temp)
        .arg("-ch")
        .assert()
        .success()
        .stdout(predicate::str::contains("cleared"));

    // Twice in a row: clear is idempotent.
    chatline_cmd(&temp).arg("-ch").assert().success();
}

#[test]
fn conflicting_actions_are_rejected() {
    let temp = TempDir::new().expect("temp dir");

    chatline_cmd(&temp)
        .args(["-vh", "-ch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn ask_without_api_key_fails_with_usage_exit_code() {
    let temp = TempDir::new().expect("temp dir");

    chatline_cmd(&temp)
        .args(["-m", "hello"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("OPENAI_API_KEY"));

    assert_eq!(message_count(&temp), 0);
}

#[test]
fn ask_with_unreachable_service_fails_and_leaves_history_empty() {
    let temp = TempDir::new().expect("temp dir");

    chatline_cmd(&temp)
        .args([
            "--api-key",
            "sk-test",
            "--api-base",
            "http://127.0.0.1:9/v1/chat/completions",
            "-m",
            "hello",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("network error"));

    assert_eq!(message_count(&temp), 0);
}

#[test]
fn blank_prompt_is_rejected_with_usage_exit_code() {
    let temp = TempDir::new().expect("temp dir");

    chatline_cmd(&temp)
        .args(["--api-key", "sk-test", "-m", "   "])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("invalid input"));
}
