// ── Node domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ids::{NodeId, ReadingId};

/// Operational state of a monitoring node. Closed vocabulary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum NodeStatus {
    Online,
    Offline,
    Maintenance,
}

impl NodeStatus {
    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

/// Projection of a node's newest sensor reading, as served by the
/// node listing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatestReading {
    pub water_level_cm: f64,
    pub signal_strength_dbm: Option<f64>,
}

/// A monitoring node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub node_id: NodeId,
    pub name: String,
    pub location_desc: Option<String>,
    pub status: NodeStatus,
    pub firmware_version: Option<String>,
    pub last_ping: DateTime<Utc>,
    /// Only present on the detail endpoint.
    pub created_at: Option<DateTime<Utc>>,
    /// Only present on the listing endpoint, and only once the node has
    /// reported at least once.
    pub latest: Option<LatestReading>,
}

/// One water-level sample from a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub reading_id: ReadingId,
    pub node_id: NodeId,
    pub timestamp: DateTime<Utc>,
    pub water_level_cm: f64,
    pub signal_strength_dbm: f64,
}

/// A node plus its recent readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDetail {
    pub node: Node,
    /// Server order: newest first.
    pub recent_readings: Vec<SensorReading>,
}

impl NodeDetail {
    /// The newest reading, if the node has reported.
    pub fn latest_reading(&self) -> Option<&SensorReading> {
        self.recent_readings.first()
    }

    /// Readings oldest first, for charting.
    pub fn chronological(&self) -> impl DoubleEndedIterator<Item = &SensorReading> + Clone {
        self.recent_readings.iter().rev()
    }

    /// Water levels oldest first.
    pub fn water_level_series(&self) -> Vec<f64> {
        self.chronological().map(|r| r.water_level_cm).collect()
    }
}
