// ── System status ──
//
// Aggregate snapshot with no identity of its own; replaced wholesale on
// every poll.

use serde::{Deserialize, Serialize};

/// Aggregate counters behind the dashboard KPI cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub nodes_online: u32,
    pub nodes_total: u32,
    pub active_alerts: u32,
    pub avg_network_latency_ms: f64,
}

/// Display strings for the dashboard KPI cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Kpis {
    pub nodes_online: String,
    pub active_alerts: String,
    pub network_latency: String,
}

impl SystemStatus {
    pub fn kpis(&self) -> Kpis {
        Kpis {
            nodes_online: format!("{} / {}", self.nodes_online, self.nodes_total),
            active_alerts: self.active_alerts.to_string(),
            network_latency: format!("{:.0} ms", self.avg_network_latency_ms),
        }
    }
}

/// Backend liveness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

impl Health {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
