// Dashboard surface: status, nodes, and active alerts fetched together.
//
// The three requests run concurrently and the cycle is all-or-nothing:
// if any one fails, nothing from that cycle is applied and the previous
// snapshot stays on screen as a unit.

use floodwatch_api::ApiClient;
use serde::Serialize;

use crate::convert::convert_all;
use crate::error::CoreError;
use crate::model::{Alert, Kpis, Node, SystemStatus};
use crate::sync::{PollOptions, PollingController};
use crate::view::{NodeCounts, order_alerts};

/// One consistent dashboard cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub status: SystemStatus,
    pub nodes: Vec<Node>,
    /// Unacknowledged alerts only, in canonical order.
    pub active_alerts: Vec<Alert>,
}

impl DashboardSnapshot {
    pub fn kpis(&self) -> Kpis {
        self.status.kpis()
    }

    pub fn node_counts(&self) -> NodeCounts {
        NodeCounts::from_nodes(&self.nodes)
    }
}

pub(crate) async fn fetch_dashboard(client: &ApiClient) -> Result<DashboardSnapshot, CoreError> {
    let (status, nodes, alerts) = tokio::try_join!(
        client.get_system_status(),
        client.list_nodes(),
        client.list_alerts(),
    )?;

    let mut active_alerts: Vec<Alert> = convert_all(alerts)?;
    active_alerts.retain(|alert| !alert.is_acknowledged);
    order_alerts(&mut active_alerts);

    Ok(DashboardSnapshot {
        status: SystemStatus::try_from(status)?,
        nodes: convert_all(nodes)?,
        active_alerts,
    })
}

/// Live dashboard.
pub struct DashboardSurface {
    poller: PollingController<DashboardSnapshot>,
}

impl DashboardSurface {
    pub fn start(client: ApiClient, options: PollOptions) -> Self {
        let poller = PollingController::start("dashboard", options, move || {
            let client = client.clone();
            async move { fetch_dashboard(&client).await }
        });
        Self { poller }
    }

    pub fn poller(&self) -> &PollingController<DashboardSnapshot> {
        &self.poller
    }

    pub fn refresh_now(&self) {
        self.poller.refresh_now();
    }

    pub fn stop(&self) {
        self.poller.stop();
    }
}
