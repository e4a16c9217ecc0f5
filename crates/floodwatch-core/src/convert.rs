// ── API-to-domain type conversions ──
//
// Bridges raw `floodwatch_api::models` responses into canonical domain
// types. Enumerated fields are closed vocabularies: an unknown status,
// severity, or level fails the conversion (and so the poll cycle) rather
// than being coerced to a guess.

use std::str::FromStr;

use floodwatch_api::models::{
    AlertResponse, EventLogResponse, HealthResponse, NodeDetailResponse, NodeResponse,
    ReadingResponse, SystemStatusResponse,
};

use crate::error::CoreError;
use crate::model::{
    Alert, AlertId, AlertSeverity, EventLog, Health, LatestReading, LogId, LogLevel, Node,
    NodeDetail, NodeId, NodeStatus, ReadingId, SensorReading, SystemStatus,
};

// ── Helpers ────────────────────────────────────────────────────────

fn parse_enum<T: FromStr>(field: &str, raw: &str) -> Result<T, CoreError> {
    raw.parse()
        .map_err(|_| CoreError::decode(format!("unknown {field} '{raw}'")))
}

fn counter(field: &str, raw: i64) -> Result<u32, CoreError> {
    u32::try_from(raw).map_err(|_| CoreError::decode(format!("{field} out of range: {raw}")))
}

/// Convert a whole listing, failing on the first bad element.
pub(crate) fn convert_all<W, D>(items: Vec<W>) -> Result<Vec<D>, CoreError>
where
    D: TryFrom<W, Error = CoreError>,
{
    items.into_iter().map(D::try_from).collect()
}

// ── System ─────────────────────────────────────────────────────────

impl TryFrom<SystemStatusResponse> for SystemStatus {
    type Error = CoreError;

    fn try_from(raw: SystemStatusResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            nodes_online: counter("nodes_online", raw.nodes_online)?,
            nodes_total: counter("nodes_total", raw.nodes_total)?,
            active_alerts: counter("active_alerts", raw.active_alerts)?,
            avg_network_latency_ms: raw.avg_network_latency_ms,
        })
    }
}

impl From<HealthResponse> for Health {
    fn from(raw: HealthResponse) -> Self {
        Self { status: raw.status }
    }
}

// ── Nodes ──────────────────────────────────────────────────────────

impl TryFrom<NodeResponse> for Node {
    type Error = CoreError;

    fn try_from(raw: NodeResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            status: parse_enum("node status", &raw.status)?,
            latest: raw.water_level_cm.map(|water_level_cm| LatestReading {
                water_level_cm,
                signal_strength_dbm: raw.signal_strength_dbm,
            }),
            node_id: NodeId::from(raw.node_id),
            name: raw.name,
            location_desc: raw.location_desc,
            firmware_version: raw.firmware_version,
            last_ping: raw.last_ping,
            created_at: raw.created_at,
        })
    }
}

impl From<ReadingResponse> for SensorReading {
    fn from(raw: ReadingResponse) -> Self {
        Self {
            reading_id: ReadingId::new(raw.reading_id),
            node_id: NodeId::from(raw.node_id),
            timestamp: raw.timestamp,
            water_level_cm: raw.water_level_cm,
            signal_strength_dbm: raw.signal_strength_dbm,
        }
    }
}

impl TryFrom<NodeDetailResponse> for NodeDetail {
    type Error = CoreError;

    fn try_from(raw: NodeDetailResponse) -> Result<Self, Self::Error> {
        let status: NodeStatus = parse_enum("node status", &raw.status)?;
        let recent_readings: Vec<SensorReading> =
            raw.recent_readings.into_iter().map(SensorReading::from).collect();
        let latest = recent_readings.first().map(|r| LatestReading {
            water_level_cm: r.water_level_cm,
            signal_strength_dbm: Some(r.signal_strength_dbm),
        });

        Ok(Self {
            node: Node {
                node_id: NodeId::from(raw.node_id),
                name: raw.name,
                location_desc: raw.location_desc,
                status,
                firmware_version: raw.firmware_version,
                last_ping: raw.last_ping,
                created_at: Some(raw.created_at),
                latest,
            },
            recent_readings,
        })
    }
}

// ── Alerts ─────────────────────────────────────────────────────────

impl TryFrom<AlertResponse> for Alert {
    type Error = CoreError;

    fn try_from(raw: AlertResponse) -> Result<Self, Self::Error> {
        let severity: AlertSeverity = parse_enum("alert severity", &raw.severity)?;
        Ok(Self {
            alert_id: AlertId::new(raw.alert_id),
            node_id: NodeId::from(raw.node_id),
            reading_id: raw.reading_id.map(ReadingId::new),
            timestamp: raw.timestamp,
            severity,
            verification_image_url: raw.verification_image_url,
            is_acknowledged: raw.is_acknowledged,
            node_name: raw.node.map(|n| n.name),
        })
    }
}

// ── Logs ───────────────────────────────────────────────────────────

impl TryFrom<EventLogResponse> for EventLog {
    type Error = CoreError;

    fn try_from(raw: EventLogResponse) -> Result<Self, Self::Error> {
        let log_level: LogLevel = parse_enum("log level", &raw.log_level)?;
        Ok(Self {
            log_id: LogId::new(raw.log_id),
            timestamp: raw.timestamp,
            source: raw.source,
            log_level,
            message: raw.message,
        })
    }
}
