// Wire types for the Floodwatch REST API
//
// Field names follow the backend's snake_case JSON exactly. Enumerated
// fields (status, severity, log level) stay as strings here; the core
// crate validates them into closed enums.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timestamp;

/// `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// `GET /system/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatusResponse {
    pub nodes_online: i64,
    pub nodes_total: i64,
    pub active_alerts: i64,
    pub avg_network_latency_ms: f64,
}

/// Element of `GET /nodes`: node columns plus the newest reading's values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeResponse {
    pub node_id: String,
    pub name: String,
    #[serde(default)]
    pub location_desc: Option<String>,
    pub status: String,
    #[serde(default)]
    pub firmware_version: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub last_ping: DateTime<Utc>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub water_level_cm: Option<f64>,
    #[serde(default)]
    pub signal_strength_dbm: Option<f64>,
}

/// One sensor sample, as embedded in [`NodeDetailResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingResponse {
    pub reading_id: i64,
    pub node_id: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    pub water_level_cm: f64,
    pub signal_strength_dbm: f64,
}

/// `GET /nodes/{node_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDetailResponse {
    pub node_id: String,
    pub name: String,
    #[serde(default)]
    pub location_desc: Option<String>,
    pub status: String,
    #[serde(default)]
    pub firmware_version: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub last_ping: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    /// Newest first, at most 20 entries.
    #[serde(default)]
    pub recent_readings: Vec<ReadingResponse>,
}

/// Nested node reference on an alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertNodeRef {
    pub name: String,
}

/// Element of `GET /alerts`, and the body of `POST /alerts/{id}/ack`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertResponse {
    pub alert_id: i64,
    pub node_id: String,
    #[serde(default)]
    pub reading_id: Option<i64>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    pub severity: String,
    #[serde(default)]
    pub verification_image_url: Option<String>,
    pub is_acknowledged: bool,
    #[serde(default)]
    pub node: Option<AlertNodeRef>,
}

/// Element of `GET /logs/events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLogResponse {
    pub log_id: i64,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub log_level: String,
    pub message: String,
}
