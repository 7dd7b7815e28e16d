//! Integration tests for the compose-agent binary.

#![allow(clippy::expect_used)]

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const VALID_CONFIG: &str = "\
server:
  host: 127.0.0.1
  port: 5050
auth:
  token: s3cretTokenValue-0001
docker:
  working_directory: /srv/app
  timeouts:
    up_secs: 300
logging:
  level: debug
";

fn agent() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("compose-agent"));
    cmd.env("NO_COLOR", "1")
        .env_remove("COMPOSE_AGENT_CONFIG")
        .env_remove("COMPOSE_AGENT_TOKEN")
        .env_remove("COMPOSE_AGENT_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("config.yml");
    std::fs::write(&path, content).expect("write config");
    path
}

// --- Help and version ---

#[test]
fn test_no_args_shows_help_and_exits_two() {
    agent().assert().code(2).stderr(predicate::str::contains(
        "Run docker compose on this host from authenticated HTTP requests",
    ));
}

#[test]
fn test_help_lists_subcommands() {
    agent()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("check-config"))
        .stdout(predicate::str::contains("remote"));
}

#[test]
fn test_version_flag() {
    agent()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("compose-agent"));
}

// --- check-config ---

#[test]
fn test_check_config_valid_masks_token() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), VALID_CONFIG);

    agent()
        .arg("--config")
        .arg(&path)
        .arg("check-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("s3cr****"))
        .stdout(predicate::str::contains("up 300s, down 60s, status 60s"))
        .stdout(predicate::str::contains("s3cretTokenValue-0001").not());
}

#[test]
fn test_check_config_json_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), VALID_CONFIG);

    let output = agent()
        .args(["--json", "check-config", "--config"])
        .arg(&path)
        .output()
        .expect("run");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["valid"], true);
    assert_eq!(value["config"]["auth"]["token"], "s3cr****");
    assert_eq!(value["config"]["docker"]["compose_command"], "docker compose");
    assert_eq!(value["config"]["docker"]["serialize"], true);
}

#[test]
fn test_check_config_reads_path_from_env() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), VALID_CONFIG);

    agent()
        .env("COMPOSE_AGENT_CONFIG", &path)
        .arg("check-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_check_config_rejects_short_token() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        "auth:\n  token: abc123\ndocker:\n  working_directory: /srv/app\n",
    );

    agent()
        .arg("--config")
        .arg(&path)
        .arg("check-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("too short"));
}

#[test]
fn test_check_config_rejects_missing_working_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), "auth:\n  token: s3cretTokenValue-0001\n");

    agent()
        .arg("--config")
        .arg(&path)
        .arg("check-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("docker.working_directory is not set"));
}

#[test]
fn test_missing_config_points_at_example() {
    let dir = tempfile::tempdir().expect("tempdir");

    agent()
        .current_dir(dir.path())
        .arg("check-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"))
        .stderr(predicate::str::contains("config.example.yml"));
}

#[test]
fn test_missing_config_json_error() {
    let dir = tempfile::tempdir().expect("tempdir");

    let output = agent()
        .current_dir(dir.path())
        .args(["--json", "check-config"])
        .output()
        .expect("run");
    assert!(!output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["error"], "client_error");
}

// --- serve ---

#[test]
fn test_serve_refuses_invalid_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), "auth:\n  token: short\n");

    agent()
        .arg("--config")
        .arg(&path)
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

// --- remote ---

#[test]
fn test_remote_compose_command_requires_token() {
    agent()
        .args(["remote", "--url", "http://127.0.0.1:9", "up"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("token is required"));
}

#[test]
fn test_remote_unreachable_agent_fails() {
    agent()
        .args(["remote", "--url", "http://127.0.0.1:9", "health"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot reach agent"));
}
