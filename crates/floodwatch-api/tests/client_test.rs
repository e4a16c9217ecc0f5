#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use floodwatch_api::{ApiClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api/v1", server.uri())).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── System tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_health() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_system_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/system/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nodes_online": 4,
            "nodes_total": 5,
            "active_alerts": 2,
            "avg_network_latency_ms": 45
        })))
        .mount(&server)
        .await;

    let status = client.get_system_status().await.unwrap();
    assert_eq!(status.nodes_online, 4);
    assert_eq!(status.nodes_total, 5);
    assert_eq!(status.active_alerts, 2);
    assert!((status.avg_network_latency_ms - 45.0).abs() < f64::EPSILON);
}

// ── Node tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_nodes() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "node_id": "NODE-001",
                "name": "Riverside",
                "location_desc": "North bank",
                "status": "Online",
                "firmware_version": "v1.2.0",
                "last_ping": "2025-10-31T10:00:00",
                "water_level_cm": 132.4,
                "signal_strength_dbm": -67
            },
            {
                "node_id": "NODE-002",
                "name": "Culvert",
                "status": "Offline",
                "last_ping": "2025-10-30T08:00:00"
            }
        ])))
        .mount(&server)
        .await;

    let nodes = client.list_nodes().await.unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].node_id, "NODE-001");
    assert_eq!(nodes[0].firmware_version.as_deref(), Some("v1.2.0"));
    assert_eq!(nodes[1].water_level_cm, None);
}

#[tokio::test]
async fn test_get_node_detail() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/nodes/NODE-001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "node_id": "NODE-001",
            "name": "Riverside",
            "status": "Maintenance",
            "last_ping": "2025-10-31T10:00:00",
            "created_at": "2025-01-01T00:00:00",
            "recent_readings": [
                {
                    "reading_id": 2,
                    "node_id": "NODE-001",
                    "timestamp": "2025-10-31T10:00:00",
                    "water_level_cm": 130.0,
                    "signal_strength_dbm": -70
                },
                {
                    "reading_id": 1,
                    "node_id": "NODE-001",
                    "timestamp": "2025-10-31T09:00:00",
                    "water_level_cm": 120.0,
                    "signal_strength_dbm": -71
                }
            ]
        })))
        .mount(&server)
        .await;

    let detail = client.get_node("NODE-001").await.unwrap();
    assert_eq!(detail.status, "Maintenance");
    assert_eq!(detail.recent_readings.len(), 2);
    assert_eq!(detail.recent_readings[0].reading_id, 2);
}

#[tokio::test]
async fn test_get_node_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/nodes/NODE-404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "Node not found" })),
        )
        .mount(&server)
        .await;

    let result = client.get_node("NODE-404").await;
    match result {
        Err(Error::NotFound { path, message }) => {
            assert_eq!(path, "/api/v1/nodes/NODE-404");
            assert_eq!(message, "Node not found");
        }
        other => panic!("expected NotFound, got: {other:?}"),
    }
}

// ── Alert tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_alerts() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "alert_id": 1,
                "node_id": "NODE-001",
                "reading_id": 10,
                "timestamp": "2025-10-31T10:00:00Z",
                "severity": "Critical",
                "verification_image_url": null,
                "is_acknowledged": false,
                "node": { "name": "Riverside" }
            }
        ])))
        .mount(&server)
        .await;

    let alerts = client.list_alerts().await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, "Critical");
    assert_eq!(alerts[0].reading_id, Some(10));
}

#[tokio::test]
async fn test_acknowledge_alert() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/alerts/1/ack"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "alert_id": 1,
            "node_id": "NODE-001",
            "timestamp": "2025-10-31T10:00:00Z",
            "severity": "Critical",
            "is_acknowledged": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.acknowledge_alert(1).await.unwrap();
}

#[tokio::test]
async fn test_acknowledge_alert_empty_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/alerts/1/ack"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.acknowledge_alert(1).await.unwrap();
}

#[tokio::test]
async fn test_acknowledge_alert_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/alerts/1/ack"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client.acknowledge_alert(1).await;
    assert!(
        matches!(result, Err(Error::Http { status: 500, .. })),
        "expected Http 500, got: {result:?}"
    );
}

// ── Log tests ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_event_logs() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/logs/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "log_id": 9,
                "timestamp": "2025-10-31T10:00:00",
                "source": "gateway",
                "log_level": "WARN",
                "message": "Packet loss above threshold"
            }
        ])))
        .mount(&server)
        .await;

    let logs = client.list_event_logs().await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].log_level, "WARN");
}

// ── Error handling tests ────────────────────────────────────────────

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let result = client.list_alerts().await;
    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "{not json"),
        other => panic!("expected Deserialization, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transient() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api/v1", server.uri())).unwrap();
    drop(server);
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);

    let err = client.list_nodes().await.unwrap_err();
    assert!(err.is_transient(), "expected transient error, got: {err:?}");
}

// ── Timeout tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_slow_response_is_a_transient_transport_timeout() {
    let server = MockServer::start().await;
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_millis(100))
        .build()
        .unwrap();
    let base_url = Url::parse(&format!("{}/api/v1", server.uri())).unwrap();
    let client = ApiClient::with_client(http, base_url);

    Mock::given(method("GET"))
        .and(path("/api/v1/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "ok" }))
                .set_delay(std::time::Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = client.health().await.unwrap_err();
    assert!(matches!(&err, Error::Transport(e) if e.is_timeout()), "got {err:?}");
    assert!(err.is_transient());
}
