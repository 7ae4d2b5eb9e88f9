//! End-to-end tests for the `nxcmd` binary.

#![allow(deprecated)] // cargo_bin still works, just deprecated for custom build-dir

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{NamedTempFile, TempDir};

/// An isolated `nxcmd` invocation: no user config, no inherited log path.
fn nxcmd(home: &TempDir) -> Command {
	let mut cmd = Command::cargo_bin("nxcmd").expect("Failed to find nxcmd binary");
	cmd.env("HOME", home.path())
		.env_remove("NXCMD_CONFIG")
		.env_remove("NXCMD_LOG_PATH")
		.env_remove("RUST_LOG");
	cmd
}

/// Writes one record per command, 30 seconds apart.
fn history(commands: &[&str]) -> NamedTempFile {
	let mut file = NamedTempFile::new().expect("Failed to create temp file");
	for (i, cmd) in commands.iter().enumerate() {
		writeln!(file, r#"{{"cmd":"{}","ts":{}}}"#, cmd, 1_700_000_000 + i * 30).expect("Failed to write record");
	}
	file
}

#[test]
fn help_lists_subcommands() {
	let home = TempDir::new().unwrap();
	nxcmd(&home)
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("suggest"))
		.stdout(predicate::str::contains("simulate"))
		.stdout(predicate::str::contains("stats"));
}

#[test]
fn missing_subcommand_fails() {
	let home = TempDir::new().unwrap();
	nxcmd(&home).assert().failure();
}

#[test]
fn simulate_requires_commands() {
	let home = TempDir::new().unwrap();
	nxcmd(&home).arg("simulate").assert().failure();
}

#[test]
fn simulate_prints_ranked_suggestions() {
	let home = TempDir::new().unwrap();
	let log = history(&["git", "add", "git commit", "git push"]);

	nxcmd(&home)
		.arg("--log")
		.arg(log.path())
		.args(["simulate", "add"])
		.assert()
		.success()
		.stdout(predicate::str::contains("1. git commit (seen 1 times)"));
}

#[test]
fn simulate_cleans_history_numbers() {
	let home = TempDir::new().unwrap();
	let log = history(&["git", "add", "git commit", "git push"]);

	nxcmd(&home)
		.arg("--log")
		.arg(log.path())
		.args(["simulate", "42  git   commit"])
		.assert()
		.success()
		.stdout(predicate::str::contains("git push"));
}

#[test]
fn simulate_json_output() {
	let home = TempDir::new().unwrap();
	let log = history(&["git", "add", "git commit", "git push"]);

	let output = nxcmd(&home)
		.arg("--log")
		.arg(log.path())
		.args(["--json", "simulate", "git", "add"])
		.output()
		.unwrap();
	assert!(output.status.success());

	let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
	assert_eq!(json["strategy"], "exact");
	assert_eq!(json["context"], serde_json::json!(["git", "add"]));
	assert_eq!(json["candidates"][0]["command"], "git commit");
	assert_eq!(json["candidates"][0]["count"], 1);
}

#[test]
fn missing_log_is_not_fatal() {
	let home = TempDir::new().unwrap();

	nxcmd(&home)
		.arg("--log")
		.arg(home.path().join("absent.jsonl"))
		.args(["simulate", "git", "add"])
		.assert()
		.success()
		.stdout(predicate::str::contains("No suggestion found"));
}

#[test]
fn suggest_uses_log_tail() {
	let home = TempDir::new().unwrap();
	let log = history(&["cd app", "cargo build", "cargo test", "cd app", "cargo build", "cargo test", "cd app", "cargo build"]);

	nxcmd(&home)
		.arg("--log")
		.arg(log.path())
		.arg("suggest")
		.assert()
		.success()
		.stdout(predicate::str::contains("After: cd app → cargo build"))
		.stdout(predicate::str::contains("1. cargo test"));
}

#[test]
fn stats_reports_counts() {
	let home = TempDir::new().unwrap();
	let log = history(&["git", "add", "git commit", "git push"]);

	nxcmd(&home)
		.arg("--log")
		.arg(log.path())
		.arg("stats")
		.assert()
		.success()
		.stdout(predicate::str::contains("Learned contexts: 5"))
		.stdout(predicate::str::contains("Distinct transitions: 5"))
		.stderr(predicate::str::contains("Parsed 1 sessions, learned 5 command patterns"));
}

#[test]
fn malformed_lines_are_warned_and_skipped() {
	let home = TempDir::new().unwrap();
	let mut log = history(&["ls", "pwd"]);
	writeln!(log, "{{not json").unwrap();

	nxcmd(&home)
		.arg("--log")
		.arg(log.path())
		.args(["simulate", "ls"])
		.assert()
		.success()
		.stdout(predicate::str::contains("pwd"))
		.stderr(predicate::str::contains("line 3"));
}

#[test]
fn config_file_sets_log_path() {
	let home = TempDir::new().unwrap();
	let log = history(&["make", "make test"]);
	let config = home.path().join("nxcmd.toml");
	std::fs::write(&config, format!("log_path = {:?}\n", log.path().display().to_string())).unwrap();

	nxcmd(&home)
		.arg("--config")
		.arg(&config)
		.args(["simulate", "make"])
		.assert()
		.success()
		.stdout(predicate::str::contains("make test"));
}

#[test]
fn verbose_logs_resolved_history_path() {
	let home = TempDir::new().unwrap();
	let log = history(&["ls", "pwd"]);

	nxcmd(&home)
		.arg("--log")
		.arg(log.path())
		.args(["-vv", "simulate", "ls"])
		.assert()
		.success()
		.stderr(predicate::str::contains(format!("reading history from {}", log.path().display())));
}
