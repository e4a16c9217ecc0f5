#![allow(clippy::unwrap_used)]
// End-to-end tests for the sync layer against a wiremock backend.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use floodwatch_core::{
    AckOutcome, AlertId, CoreError, LogId, Monitor, MonitorConfig, NodeId, PollIntervals,
    PollState, ViewStream,
};

// ── Helpers ─────────────────────────────────────────────────────────

const WAIT: Duration = Duration::from_secs(5);

async fn setup() -> (MockServer, Monitor) {
    let server = MockServer::start().await;
    let api_url = Url::parse(&format!("{}/api/v1", server.uri())).unwrap();
    let hour = Duration::from_secs(3600);
    let config = MonitorConfig {
        intervals: PollIntervals {
            dashboard: hour,
            nodes: hour,
            alerts: hour,
            logs: hour,
        },
        ..MonitorConfig::with_api_url(api_url)
    };
    (server, Monitor::new(config).unwrap())
}

async fn mount_get(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1{route}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn wait_for<T, F>(stream: &mut ViewStream<PollState<T>>, pred: F) -> PollState<T>
where
    T: Send + Sync + 'static,
    F: Fn(&PollState<T>) -> bool,
{
    let latest = stream.latest();
    if pred(&latest) {
        return latest;
    }
    tokio::time::timeout(WAIT, async {
        loop {
            let state = stream.changed().await.expect("poller dropped");
            if pred(&state) {
                return state;
            }
        }
    })
    .await
    .expect("timed out waiting for poll state")
}

fn alert_json(id: i64, acked: bool, timestamp: &str, severity: &str) -> Value {
    json!({
        "alert_id": id,
        "node_id": "NODE-001",
        "reading_id": null,
        "timestamp": timestamp,
        "severity": severity,
        "verification_image_url": null,
        "is_acknowledged": acked
    })
}

fn node_json(id: &str, name: &str) -> Value {
    json!({
        "node_id": id,
        "name": name,
        "location_desc": null,
        "status": "Online",
        "firmware_version": "v1.2.0",
        "last_ping": "2025-10-31T10:00:00",
        "water_level_cm": 120.0,
        "signal_strength_dbm": -70
    })
}

fn node_detail_json(id: &str) -> Value {
    json!({
        "node_id": id,
        "name": format!("Node {id}"),
        "status": "Online",
        "last_ping": "2025-10-31T10:00:00",
        "created_at": "2025-01-01T00:00:00",
        "recent_readings": [{
            "reading_id": 1,
            "node_id": id,
            "timestamp": "2025-10-31T10:00:00",
            "water_level_cm": 120.0,
            "signal_strength_dbm": -70
        }]
    })
}

fn status_json() -> Value {
    json!({
        "nodes_online": 1,
        "nodes_total": 2,
        "active_alerts": 1,
        "avg_network_latency_ms": 42.5
    })
}

fn ids(state: &PollState<Vec<floodwatch_core::Alert>>) -> Vec<i64> {
    state
        .data
        .as_ref()
        .map(|alerts| alerts.iter().map(|a| a.alert_id.get()).collect())
        .unwrap_or_default()
}

// ── Alert ordering & acknowledgment ─────────────────────────────────

#[tokio::test]
async fn test_acknowledge_reorders_after_authoritative_reread() {
    let (server, monitor) = setup().await;
    mount_get(
        &server,
        "/alerts",
        json!([
            alert_json(1, false, "2025-10-31T10:00:00Z", "Critical"),
            alert_json(2, true, "2025-10-31T12:00:00Z", "Warning"),
        ]),
    )
    .await;

    let surface = monitor.watch_alerts();
    let mut updates = surface.poller().subscribe();
    let state = wait_for(&mut updates, |s| s.data.is_some()).await;
    assert_eq!(ids(&state), vec![1, 2], "unacknowledged first despite being older");

    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/alerts/1/ack"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(alert_json(1, true, "2025-10-31T10:00:00Z", "Critical")),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_get(
        &server,
        "/alerts",
        json!([
            alert_json(2, true, "2025-10-31T12:00:00Z", "Warning"),
            alert_json(1, true, "2025-10-31T10:00:00Z", "Critical"),
        ]),
    )
    .await;

    let outcome = surface.acknowledge(AlertId::new(1)).await.unwrap();
    assert_eq!(outcome, AckOutcome::Sent);

    let state = wait_for(&mut updates, |s| {
        s.data
            .as_ref()
            .is_some_and(|alerts| alerts.iter().all(|a| a.is_acknowledged))
    })
    .await;
    assert_eq!(ids(&state), vec![2, 1], "tie on state broken by newest first");
    assert_eq!(surface.mutations().last_error(), None);
}

#[tokio::test]
async fn test_acknowledge_failure_leaves_alert_unacknowledged() {
    let (server, monitor) = setup().await;
    mount_get(
        &server,
        "/alerts",
        json!([alert_json(1, false, "2025-10-31T10:00:00Z", "Critical")]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/alerts/1/ack"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "db down" })))
        .mount(&server)
        .await;

    let surface = monitor.watch_alerts();
    let mut updates = surface.poller().subscribe();
    wait_for(&mut updates, |s| s.data.is_some()).await;

    let err = surface.acknowledge(AlertId::new(1)).await.unwrap_err();
    assert_eq!(
        err,
        CoreError::Server {
            status: 500,
            message: "db down".into()
        }
    );
    assert_eq!(surface.mutations().last_error(), Some(err));

    tokio::time::sleep(Duration::from_millis(200)).await;
    let state = surface.poller().state();
    let alerts = state.data.unwrap();
    assert!(!alerts[0].is_acknowledged);
    assert_eq!(state.cycles, 1, "failed mutation must not trigger a re-read");
}

#[tokio::test]
async fn test_concurrent_acknowledgments_are_deduplicated() {
    let (server, monitor) = setup().await;
    mount_get(
        &server,
        "/alerts",
        json!([alert_json(7, false, "2025-10-31T10:00:00Z", "Warning")]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/alerts/7/ack"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(alert_json(7, true, "2025-10-31T10:00:00Z", "Warning"))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let surface = monitor.watch_alerts();
    let (first, second) = tokio::join!(
        surface.acknowledge(AlertId::new(7)),
        surface.acknowledge(AlertId::new(7)),
    );
    let mut outcomes = vec![first.unwrap(), second.unwrap()];
    outcomes.sort_by_key(|o| *o == AckOutcome::AlreadyPending);
    assert_eq!(outcomes, vec![AckOutcome::Sent, AckOutcome::AlreadyPending]);
    assert!(!surface.mutations().is_pending(AlertId::new(7)));
}

// ── Dashboard ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_dashboard_cycle_is_all_or_nothing() {
    let (server, monitor) = setup().await;
    mount_get(&server, "/system/status", status_json()).await;
    mount_get(
        &server,
        "/nodes",
        json!([node_json("NODE-001", "Riverside"), node_json("NODE-002", "Bridge")]),
    )
    .await;
    mount_get(
        &server,
        "/alerts",
        json!([
            alert_json(1, false, "2025-10-31T09:00:00Z", "Warning"),
            alert_json(2, true, "2025-10-31T12:00:00Z", "Critical"),
            alert_json(3, false, "2025-10-31T11:00:00Z", "Critical"),
        ]),
    )
    .await;

    let surface = monitor.watch_dashboard();
    let mut updates = surface.poller().subscribe();
    let state = wait_for(&mut updates, |s| s.data.is_some()).await;
    let snapshot = state.data.unwrap();
    let active: Vec<i64> = snapshot.active_alerts.iter().map(|a| a.alert_id.get()).collect();
    assert_eq!(active, vec![3, 1]);
    assert_eq!(snapshot.kpis().nodes_online, "1 / 2");
    assert_eq!(snapshot.nodes.len(), 2);

    server.reset().await;
    mount_get(&server, "/system/status", status_json()).await;
    mount_get(&server, "/nodes", json!([node_json("NODE-009", "New")])).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/alerts"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    surface.refresh_now();
    let state = wait_for(&mut updates, |s| s.error.is_some()).await;
    assert!(matches!(state.error, Some(CoreError::Server { status: 503, .. })));
    let kept = state.data.unwrap();
    assert_eq!(kept, snapshot, "no fresh sub-result may leak into a failed cycle");

    let err = monitor.dashboard().await.unwrap_err();
    assert!(err.is_transient());
}

// ── Node selection ──────────────────────────────────────────────────

#[tokio::test]
async fn test_node_reselection_ignores_slow_earlier_detail() {
    let (server, monitor) = setup().await;
    mount_get(
        &server,
        "/nodes",
        json!([node_json("NODE-001", "Riverside"), node_json("NODE-002", "Bridge")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/nodes/NODE-001"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(node_detail_json("NODE-001"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    mount_get(&server, "/nodes/NODE-002", node_detail_json("NODE-002")).await;

    let surface = monitor.watch_nodes();
    assert!(surface.select(NodeId::new("NODE-001")));
    assert!(surface.select(NodeId::new("NODE-002")));

    let mut selection = surface.selection().subscribe();
    let state = tokio::time::timeout(WAIT, async {
        loop {
            let state = selection.latest();
            if state.detail.is_some() {
                return state;
            }
            selection.changed().await.unwrap();
        }
    })
    .await
    .unwrap();
    assert_eq!(state.detail.unwrap().node.node_id, NodeId::new("NODE-002"));

    tokio::time::sleep(Duration::from_millis(700)).await;
    let state = surface.selection().state();
    assert_eq!(state.selected, Some(NodeId::new("NODE-002")));
    assert_eq!(state.detail.unwrap().node.node_id, NodeId::new("NODE-002"));

    assert!(!surface.select(NodeId::new("NODE-002")), "second click closes");
    assert_eq!(surface.selection().selected(), None);
}

#[tokio::test]
async fn test_unknown_node_detail_surfaces_not_found() {
    let (server, monitor) = setup().await;
    mount_get(&server, "/nodes", json!([])).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/nodes/NODE-404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Node not found" })))
        .mount(&server)
        .await;

    let err = monitor.node_detail(&NodeId::new("NODE-404")).await.unwrap_err();
    assert!(err.is_not_found());
}

// ── Logs ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_log_selection_resolves_from_snapshot() {
    let (server, monitor) = setup().await;
    mount_get(
        &server,
        "/logs/events",
        json!([
            {
                "log_id": 2,
                "timestamp": "2025-10-31T10:05:00",
                "source": "gateway",
                "log_level": "ERROR",
                "message": "Uplink lost"
            },
            {
                "log_id": 1,
                "timestamp": "2025-10-31T10:00:00",
                "source": "NODE-001",
                "log_level": "INFO",
                "message": "Heartbeat"
            }
        ]),
    )
    .await;

    let surface = monitor.watch_logs();
    let mut updates = surface.poller().subscribe();
    wait_for(&mut updates, |s| s.data.is_some()).await;
    assert_eq!(surface.counts().error, 1);

    surface.select(LogId::new(2));
    tokio::time::sleep(Duration::from_millis(50)).await;
    let state = surface.selection().state();
    assert_eq!(state.detail.unwrap().message, "Uplink lost");

    surface.select(LogId::new(99));
    tokio::time::sleep(Duration::from_millis(50)).await;
    let state = surface.selection().state();
    assert!(state.error.unwrap().is_not_found());
}

// ── Decoding ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_unknown_severity_fails_the_cycle() {
    let (server, monitor) = setup().await;
    mount_get(
        &server,
        "/alerts",
        json!([alert_json(1, false, "2025-10-31T10:00:00Z", "Apocalyptic")]),
    )
    .await;

    let surface = monitor.watch_alerts();
    let mut updates = surface.poller().subscribe();
    let state = wait_for(&mut updates, |s| s.error.is_some()).await;
    assert!(matches!(state.error, Some(CoreError::Decode { .. })));
    assert!(state.data.is_none());
    assert!(!state.loading);
}

#[tokio::test]
async fn test_one_shot_reads() {
    let (server, monitor) = setup().await;
    mount_get(&server, "/health", json!({ "status": "ok" })).await;
    mount_get(
        &server,
        "/alerts",
        json!([
            alert_json(1, true, "2025-10-31T12:00:00Z", "INFO"),
            alert_json(2, false, "2025-10-31T08:00:00Z", "Warning"),
        ]),
    )
    .await;

    assert!(monitor.health().await.unwrap().is_ok());
    let alerts = monitor.alerts().await.unwrap();
    assert_eq!(alerts[0].alert_id, AlertId::new(2));
    let alert = monitor.alert(AlertId::new(1)).await.unwrap();
    assert!(alert.is_acknowledged);
    assert!(monitor.alert(AlertId::new(5)).await.unwrap_err().is_not_found());
}
