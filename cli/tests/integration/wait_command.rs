//! Integration tests for `sitedeploy wait` against local sockets.
//!
//! The stub server runs on the test's tokio runtime while the binary is
//! driven from a blocking task.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::stub::{StubServer, closed_port};

fn sitedeploy(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sitedeploy"));
    cmd.env("NO_COLOR", "1")
        .env("SITEDEPLOY_CONFIG", dir.path().join("config.yaml"))
        .env_remove("RUST_LOG");
    cmd
}

/// Run `cmd` off the async runtime and return its output.
async fn run(mut cmd: Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().expect("spawn"))
        .await
        .expect("join")
}

#[test]
fn test_wait_empty_url_is_invalid_target() {
    let dir = TempDir::new().expect("temp dir");
    sitedeploy(&dir)
        .args(["wait", ""])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid target URL"));
}

#[test]
fn test_wait_bad_scheme_json_error() {
    let dir = TempDir::new().expect("temp dir");
    let assert = sitedeploy(&dir)
        .args(["wait", "ftp://example.com", "--json"])
        .assert()
        .code(1);
    let v: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid JSON");
    assert_eq!(v["error"], true);
    assert_eq!(v["code"], "INVALID_TARGET");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_wait_closed_port_gives_up_after_max_attempts() {
    let dir = TempDir::new().expect("temp dir");
    let port = closed_port().await;
    let mut cmd = sitedeploy(&dir);
    cmd.args([
        "wait",
        &format!("http://127.0.0.1:{port}"),
        "--interval",
        "1",
        "--max-attempts",
        "2",
    ]);

    let out = run(cmd).await;

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Site not ready after 2 attempt(s)"), "{stderr}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_wait_succeeds_once_server_is_ready() {
    let dir = TempDir::new().expect("temp dir");
    let server = StubServer::start(&[503, 200]).await;
    let mut cmd = sitedeploy(&dir);
    cmd.args(["wait", &server.url(), "--interval", "1", "--json"]);

    let out = run(cmd).await;

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid JSON");
    assert_eq!(v["ready"], true);
    assert_eq!(v["status"], 200);
    assert_eq!(v["attempts"], 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_wait_get_method_and_custom_status() {
    let dir = TempDir::new().expect("temp dir");
    let server = StubServer::start(&[200, 204]).await;
    let mut cmd = sitedeploy(&dir);
    cmd.args([
        "wait",
        &server.url(),
        "--interval",
        "1",
        "--method",
        "get",
        "--ready-status",
        "204",
    ]);

    let out = run(cmd).await;

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let lines = server.request_lines();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.starts_with("GET ")), "{lines:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_wait_uses_config_file_policy() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join("config.yaml"),
        "readiness:\n  interval_secs: 1\n  max_attempts: 1\n",
    )
    .expect("write config");
    let server = StubServer::start(&[503]).await;
    let mut cmd = sitedeploy(&dir);
    cmd.args(["wait", &server.url()]);

    let out = run(cmd).await;

    assert_eq!(out.status.code(), Some(1));
    assert_eq!(server.request_lines().len(), 1);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("HTTP 503"), "{stderr}");
}
