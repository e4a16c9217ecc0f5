//! Integration tests for the `floodwatch` CLI binary.
//!
//! Argument parsing, help, completions, and config handling run without a
//! backend; the remaining tests point the binary at a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `floodwatch` binary with env isolation.
///
/// Clears all `FLOODWATCH_*` env vars and points config directories at
/// `home` so tests never touch the user's real configuration.
fn floodwatch_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("floodwatch");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("FLOODWATCH_PROFILE")
        .env_remove("FLOODWATCH_API_URL")
        .env_remove("FLOODWATCH_OUTPUT")
        .env_remove("FLOODWATCH_INSECURE")
        .env_remove("FLOODWATCH_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn backend() -> (MockServer, String) {
    let server = MockServer::start().await;
    let api_url = format!("{}/api/v1", server.uri());
    (server, api_url)
}

async fn mount_get(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1{route}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn node_json(id: &str, name: &str, status: &str, firmware: &str) -> Value {
    json!({
        "node_id": id,
        "name": name,
        "location_desc": null,
        "status": status,
        "firmware_version": firmware,
        "last_ping": "2025-10-31T10:00:00",
        "water_level_cm": 120.0,
        "signal_strength_dbm": -70
    })
}

fn alert_json(id: i64, acked: bool, timestamp: &str, severity: &str) -> Value {
    json!({
        "alert_id": id,
        "node_id": "NODE-001",
        "reading_id": null,
        "timestamp": timestamp,
        "severity": severity,
        "verification_image_url": null,
        "is_acknowledged": acked,
        "node": { "name": "Riverside" }
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = floodwatch_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    floodwatch_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("nodes")
                .and(predicate::str::contains("alerts"))
                .and(predicate::str::contains("logs"))
                .and(predicate::str::contains("watch")),
        );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    floodwatch_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("floodwatch"));
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    floodwatch_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_invalid_output_format() {
    let home = tempfile::tempdir().unwrap();
    let output = floodwatch_cmd(home.path())
        .args(["--output", "invalid", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_invalid_state_filter() {
    let home = tempfile::tempdir().unwrap();
    floodwatch_cmd(home.path())
        .args(["alerts", "list", "--state", "pending"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unacknowledged"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    let home = tempfile::tempdir().unwrap();
    floodwatch_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_profile"));
}

#[test]
fn test_config_path_uses_config_dir() {
    let home = tempfile::tempdir().unwrap();
    floodwatch_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("floodwatch").and(predicate::str::contains("config.toml")));
}

#[test]
fn test_config_init_then_use() {
    let home = tempfile::tempdir().unwrap();
    floodwatch_cmd(home.path())
        .args([
            "--api-url",
            "http://10.0.0.5:8000/api/v1",
            "config",
            "init",
            "--name",
            "river",
        ])
        .assert()
        .success();

    floodwatch_cmd(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("river").and(predicate::str::contains("10.0.0.5")));

    let output = floodwatch_cmd(home.path())
        .args(["config", "use", "lake"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("lake"));

    floodwatch_cmd(home.path())
        .args(["config", "use", "river"])
        .assert()
        .success();
}

#[test]
fn test_config_init_rejects_bad_url() {
    let home = tempfile::tempdir().unwrap();
    floodwatch_cmd(home.path())
        .args(["--api-url", "not a url", "config", "init", "--name", "x"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_unknown_profile() {
    let home = tempfile::tempdir().unwrap();
    floodwatch_cmd(home.path())
        .args(["--profile", "nowhere", "status"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("nowhere"));
}

// ── Backend-bound commands ──────────────────────────────────────────

#[test]
fn test_connection_refused_exit_code() {
    let home = tempfile::tempdir().unwrap();
    floodwatch_cmd(home.path())
        .args(["--api-url", "http://127.0.0.1:1/api/v1", "--timeout", "2", "health"])
        .assert()
        .failure()
        .code(7);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_prints_kpis() {
    let (server, api_url) = backend().await;
    mount_get(
        &server,
        "/system/status",
        json!({
            "nodes_online": 4,
            "nodes_total": 5,
            "active_alerts": 2,
            "avg_network_latency_ms": 45.2
        }),
    )
    .await;

    let home = tempfile::tempdir().unwrap();
    floodwatch_cmd(home.path())
        .args(["--api-url", &api_url, "status"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("4 / 5")
                .and(predicate::str::contains("45 ms"))
                .and(predicate::str::contains("Active alerts:    2")),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_nodes_list_filters_and_paginates() {
    let (server, api_url) = backend().await;
    let nodes: Vec<Value> = (1..=12)
        .map(|i| {
            let status = if i % 3 == 0 { "Offline" } else { "Online" };
            node_json(&format!("NODE-{i:03}"), &format!("Gauge {i}"), status, "v1.2.0")
        })
        .collect();
    mount_get(&server, "/nodes", Value::Array(nodes)).await;

    let home = tempfile::tempdir().unwrap();

    // 8 online nodes, 5 per page: page 2 holds the last 3.
    let output = floodwatch_cmd(home.path())
        .args([
            "--api-url", &api_url, "-o", "json", "nodes", "list", "--status", "online",
            "--per-page", "5", "--page", "2",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let page: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = page.iter().map(|n| n["node_id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["NODE-008", "NODE-010", "NODE-011"]);

    // Out-of-range pages clamp to the last one.
    floodwatch_cmd(home.path())
        .args([
            "--api-url", &api_url, "-o", "plain", "nodes", "list", "--search", "gauge 1",
            "--per-page", "2", "--page", "99",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("NODE-012").and(predicate::str::contains("NODE-001").not()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_node_show_missing_is_not_found() {
    let (server, api_url) = backend().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/nodes/NODE-404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Node not found"})))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    floodwatch_cmd(home.path())
        .args(["--api-url", &api_url, "nodes", "show", "NODE-404"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("NODE-404"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_node_show_renders_sparkline() {
    let (server, api_url) = backend().await;
    mount_get(
        &server,
        "/nodes/NODE-001",
        json!({
            "node_id": "NODE-001",
            "name": "Riverside",
            "status": "Online",
            "last_ping": "2025-10-31T10:00:00",
            "created_at": "2025-01-01T00:00:00",
            "recent_readings": [
                { "reading_id": 3, "node_id": "NODE-001", "timestamp": "2025-10-31T10:00:00",
                  "water_level_cm": 30.0, "signal_strength_dbm": -70 },
                { "reading_id": 2, "node_id": "NODE-001", "timestamp": "2025-10-31T09:00:00",
                  "water_level_cm": 20.0, "signal_strength_dbm": -71 },
                { "reading_id": 1, "node_id": "NODE-001", "timestamp": "2025-10-31T08:00:00",
                  "water_level_cm": 10.0, "signal_strength_dbm": -72 }
            ]
        }),
    )
    .await;

    let home = tempfile::tempdir().unwrap();
    floodwatch_cmd(home.path())
        .args(["--api-url", &api_url, "nodes", "show", "NODE-001"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Riverside")
                .and(predicate::str::contains("30.0 cm"))
                .and(predicate::str::contains("▁▅█")),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_alerts_list_orders_unacknowledged_first() {
    let (server, api_url) = backend().await;
    mount_get(
        &server,
        "/alerts",
        json!([
            alert_json(1, true, "2025-10-31T12:00:00", "Critical"),
            alert_json(2, false, "2025-10-31T09:00:00", "Warning"),
            alert_json(3, false, "2025-10-31T11:00:00", "INFO"),
        ]),
    )
    .await;

    let home = tempfile::tempdir().unwrap();
    let output = floodwatch_cmd(home.path())
        .args(["--api-url", &api_url, "-o", "plain", "alerts", "list"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "3\n2\n1");

    floodwatch_cmd(home.path())
        .args([
            "--api-url", &api_url, "-o", "plain", "alerts", "list", "--state", "acknowledged",
        ])
        .assert()
        .success()
        .stdout(predicate::eq("1\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_alert_ack_prints_reread_state() {
    let (server, api_url) = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/alerts/2/ack"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;
    // First read predates the acknowledgment; every later one reflects it.
    Mock::given(method("GET"))
        .and(path("/api/v1/alerts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([alert_json(2, false, "2025-10-31T09:00:00", "Warning")])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_get(
        &server,
        "/alerts",
        json!([alert_json(2, true, "2025-10-31T09:00:00", "Warning")]),
    )
    .await;

    let home = tempfile::tempdir().unwrap();
    floodwatch_cmd(home.path())
        .args(["--api-url", &api_url, "-o", "plain", "alerts", "ack", "2"])
        .assert()
        .success()
        .stdout(predicate::eq("acknowledged\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_alert_ack_waits_past_a_failed_earlier_read() {
    let (server, api_url) = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/alerts/2/ack"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;
    // The read already in flight fails; the re-read after the ack succeeds.
    Mock::given(method("GET"))
        .and(path("/api/v1/alerts"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_json(json!({"detail": "warming up"}))
                .set_delay(std::time::Duration::from_millis(200)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_get(
        &server,
        "/alerts",
        json!([alert_json(2, true, "2025-10-31T09:00:00", "Warning")]),
    )
    .await;

    let home = tempfile::tempdir().unwrap();
    floodwatch_cmd(home.path())
        .args(["--api-url", &api_url, "-o", "plain", "alerts", "ack", "2"])
        .assert()
        .success()
        .stdout(predicate::eq("acknowledged\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_alert_ack_failure_surfaces_server_message() {
    let (server, api_url) = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/alerts/2/ack"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "db down"})))
        .mount(&server)
        .await;
    mount_get(
        &server,
        "/alerts",
        json!([alert_json(2, false, "2025-10-31T09:00:00", "Warning")]),
    )
    .await;

    let home = tempfile::tempdir().unwrap();
    floodwatch_cmd(home.path())
        .args(["--api-url", &api_url, "alerts", "ack", "2"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("db down"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logs_list_filters_by_level() {
    let (server, api_url) = backend().await;
    mount_get(
        &server,
        "/logs/events",
        json!([
            { "log_id": 1, "timestamp": "2025-10-31T10:00:00", "source": "ingest",
              "log_level": "INFO", "message": "Reading stored" },
            { "log_id": 2, "timestamp": "2025-10-31T10:01:00", "source": "ingest",
              "log_level": "ERROR", "message": "Sensor timeout" },
        ]),
    )
    .await;

    let home = tempfile::tempdir().unwrap();
    let output = floodwatch_cmd(home.path())
        .args(["--api-url", &api_url, "-o", "json", "logs", "list", "--level", "error"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let logs: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["message"], "Sensor timeout");
}
