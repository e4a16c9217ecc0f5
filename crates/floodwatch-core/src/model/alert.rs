// ── Alert domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ids::{AlertId, NodeId, ReadingId};

/// Alert severity. Wire strings are `INFO`, `Warning`, and `Critical`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum AlertSeverity {
    #[serde(rename = "INFO")]
    #[strum(serialize = "INFO")]
    Info,
    Warning,
    Critical,
}

/// Acknowledgment state, for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AckState {
    Unacknowledged,
    Acknowledged,
}

/// A threshold alert raised from a sensor reading.
///
/// `is_acknowledged` only ever moves from `false` to `true`, and only by
/// an authoritative re-read after an acknowledgment command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub alert_id: AlertId,
    pub node_id: NodeId,
    pub reading_id: Option<ReadingId>,
    pub timestamp: DateTime<Utc>,
    pub severity: AlertSeverity,
    pub verification_image_url: Option<String>,
    pub is_acknowledged: bool,
    /// Display name of the originating node, when the backend joins it in.
    pub node_name: Option<String>,
}

impl Alert {
    pub fn ack_state(&self) -> AckState {
        if self.is_acknowledged {
            AckState::Acknowledged
        } else {
            AckState::Unacknowledged
        }
    }

    /// Node name when known, otherwise the node id.
    pub fn node_label(&self) -> &str {
        self.node_name.as_deref().unwrap_or(self.node_id.as_str())
    }
}
