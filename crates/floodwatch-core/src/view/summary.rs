// ── Summary counters ──
//
// Small aggregates shown beside tables: nodes by status, alerts by
// state, logs by level, and the firmware versions offered as filter
// options.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::{Alert, AlertSeverity, EventLog, LogLevel, Node, NodeStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NodeCounts {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
    pub maintenance: usize,
}

impl NodeCounts {
    pub fn from_nodes(nodes: &[Node]) -> Self {
        nodes.iter().fold(Self::default(), |mut acc, node| {
            acc.total += 1;
            match node.status {
                NodeStatus::Online => acc.online += 1,
                NodeStatus::Offline => acc.offline += 1,
                NodeStatus::Maintenance => acc.maintenance += 1,
            }
            acc
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlertCounts {
    pub total: usize,
    pub unacknowledged: usize,
    pub acknowledged: usize,
    pub critical: usize,
}

impl AlertCounts {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        alerts.iter().fold(Self::default(), |mut acc, alert| {
            acc.total += 1;
            if alert.is_acknowledged {
                acc.acknowledged += 1;
            } else {
                acc.unacknowledged += 1;
            }
            if alert.severity == AlertSeverity::Critical {
                acc.critical += 1;
            }
            acc
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LogCounts {
    pub total: usize,
    pub info: usize,
    pub warn: usize,
    pub error: usize,
}

impl LogCounts {
    pub fn from_logs(logs: &[EventLog]) -> Self {
        logs.iter().fold(Self::default(), |mut acc, log| {
            acc.total += 1;
            match log.log_level {
                LogLevel::Info => acc.info += 1,
                LogLevel::Warn => acc.warn += 1,
                LogLevel::Error => acc.error += 1,
            }
            acc
        })
    }
}

/// Distinct firmware versions reported by `nodes`, sorted.
pub fn firmware_versions(nodes: &[Node]) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|n| n.firmware_version.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
