//! Integration tests for the mocopro binary: exit codes and error output.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

/// Isolated home, state directory and project directory.
struct Sandbox {
    temp: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let temp = tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join("home")).unwrap();
        std::fs::create_dir_all(temp.path().join("project")).unwrap();
        Self { temp }
    }

    fn mocopro(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mocopro"));
        cmd.current_dir(self.temp.path().join("project"))
            .env("HOME", self.temp.path().join("home"))
            .env("MOCOPRO_HOME", self.temp.path().join("state"))
            .env_remove("RUST_LOG");
        cmd
    }
}

/// Run `args`, expect exit code 1 and return stderr.
fn failure_stderr(sandbox: &Sandbox, args: &[&str]) -> String {
    let output = sandbox
        .mocopro()
        .args(args)
        .assert()
        .failure()
        .code(1)
        .get_output()
        .clone();
    String::from_utf8(output.stderr).unwrap()
}

#[test]
fn empty_list_succeeds() {
    let sandbox = Sandbox::new();
    sandbox
        .mocopro()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No MCP servers installed."))
        .stderr(predicate::str::is_empty());
}

#[test]
fn env_list_for_unknown_server_fails_with_one_line() {
    let sandbox = Sandbox::new();
    let stderr = failure_stderr(&sandbox, &["env", "list", "missing"]);
    assert_eq!(stderr, "Error: Server \"missing\" is not installed.\n");
}

#[test]
fn install_rejects_bare_repository_name() {
    let sandbox = Sandbox::new();
    let stderr = failure_stderr(&sandbox, &["install", "justarepo"]);
    assert!(stderr.starts_with("Error: Invalid repository format: \"justarepo\"."));
    assert_eq!(stderr.lines().count(), 1);
    assert!(!sandbox.temp.path().join("state/registry.json").exists());
}

#[test]
fn setup_remove_for_unconfigured_server_fails() {
    let sandbox = Sandbox::new();
    let stderr = failure_stderr(&sandbox, &["setup", "claude", "remove", "x"]);
    assert!(stderr.starts_with("Error: Server \"x\" is not configured"));
    assert_eq!(stderr.lines().count(), 1);
    assert!(!sandbox.temp.path().join("project/.mcp.json").exists());
}

#[test]
fn usage_errors_exit_with_one() {
    let sandbox = Sandbox::new();
    sandbox
        .mocopro()
        .arg("install")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_succeeds() {
    let sandbox = Sandbox::new();
    sandbox
        .mocopro()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("manage MCP servers"));
}
