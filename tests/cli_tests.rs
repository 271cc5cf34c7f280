//! CLI integration tests for the ghp binary.
//!
//! These tests exercise argument parsing and the local resolution steps
//! (configuration, repository, branch, token) that run before any network
//! call. Tests that would reach the network stop at the missing-token
//! error instead.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for running ghp with token and config environment cleared.
///
/// `home` isolates the global config lookup so a developer's own
/// `~/.config/ghpush/config.toml` cannot leak into the test.
fn ghp(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ghp").unwrap();
    cmd.env_remove("GHPUSH_TOKEN")
        .env_remove("GITHUB_TOKEN")
        .env_remove("GHPUSH_CONFIG")
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("xdg"));
    cmd
}

#[test]
fn help_flag_works() {
    let temp = TempDir::new().unwrap();
    ghp(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Commit single files"));
}

#[test]
fn version_flag_works() {
    let temp = TempDir::new().unwrap();
    ghp(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ghp"));
}

#[test]
fn push_help_shows_workflow_examples() {
    let temp = TempDir::new().unwrap();
    ghp(temp.path())
        .args(["push", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WORKFLOW EXAMPLES"))
        .stdout(predicate::str::contains("CONCURRENT WRITERS"));
}

#[test]
fn push_without_repository_fails() {
    let temp = TempDir::new().unwrap();
    ghp(temp.path())
        .args(["--cwd"])
        .arg(temp.path())
        .args(["push", "f.txt", "-m", "msg", "--content", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no repository configured"));
}

#[test]
fn push_with_malformed_repo_flag_fails() {
    let temp = TempDir::new().unwrap();
    ghp(temp.path())
        .args(["--cwd"])
        .arg(temp.path())
        .args(["--repo", "not a repo"])
        .args(["push", "f.txt", "-m", "msg", "--content", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid repository"));
}

#[test]
fn push_without_branch_fails() {
    let temp = TempDir::new().unwrap();
    ghp(temp.path())
        .args(["--cwd"])
        .arg(temp.path())
        .args(["--repo", "octocat/hello-world"])
        .args(["push", "f.txt", "-m", "msg", "--content", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no branch configured"));
}

#[test]
fn push_without_token_fails_before_any_network_call() {
    let temp = TempDir::new().unwrap();
    ghp(temp.path())
        .args(["--cwd"])
        .arg(temp.path())
        .args(["--repo", "octocat/hello-world"])
        .args(["push", "f.txt", "-m", "msg", "--branch", "main", "--content", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API token found"));
}

#[test]
fn push_rejects_content_and_from_together() {
    let temp = TempDir::new().unwrap();
    ghp(temp.path())
        .args(["push", "f.txt", "-m", "msg"])
        .args(["--content", "hi", "--from", "local.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn project_config_supplies_repository_and_branch() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(".ghpush.toml"),
        r#"
        [repository]
        owner = "octocat"
        name = "hello-world"
        branch = "main"
        "#,
    )
    .unwrap();

    // Repository and branch resolve from the project config, so the first
    // failure is the missing token, well past coordinate resolution.
    ghp(temp.path())
        .args(["--cwd"])
        .arg(temp.path())
        .args(["push", "f.txt", "-m", "msg", "--content", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API token found"));
}

#[test]
fn global_config_via_env_is_picked_up() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("global.toml");
    fs::write(
        &config_path,
        r#"
        [repository]
        owner = "octocat"
        name = "hello-world"
        branch = "main"
        "#,
    )
    .unwrap();

    let cwd = TempDir::new().unwrap();
    ghp(temp.path())
        .env("GHPUSH_CONFIG", &config_path)
        .args(["--cwd"])
        .arg(cwd.path())
        .args(["push", "f.txt", "-m", "msg", "--content", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API token found"));
}

#[test]
fn unknown_config_field_is_rejected() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(".ghpush.toml"), "unknown_field = true").unwrap();

    ghp(temp.path())
        .args(["--cwd"])
        .arg(temp.path())
        .args(["push", "f.txt", "-m", "msg", "--content", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config file"));
}

#[test]
fn whoami_without_token_fails() {
    let temp = TempDir::new().unwrap();
    ghp(temp.path())
        .args(["--cwd"])
        .arg(temp.path())
        .args(["--repo", "octocat/hello-world"])
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API token found"));
}

#[test]
fn repos_rejects_non_numeric_per_page() {
    let temp = TempDir::new().unwrap();
    ghp(temp.path())
        .args(["repos", "--per-page", "lots"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
