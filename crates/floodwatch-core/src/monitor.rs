// ── Monitor facade ──
//
// Entry point for consumers. Holds the API client and configuration,
// offers one-shot reads for single CLI invocations, and vends live
// surfaces that poll on the configured cadence.

use std::sync::Arc;
use std::time::Duration;

use floodwatch_api::ApiClient;
use tracing::debug;

use crate::config::MonitorConfig;
use crate::error::CoreError;
use crate::model::{Alert, AlertId, EventLog, Health, Node, NodeDetail, NodeId, SystemStatus};
use crate::surface::{
    AlertsSurface, DashboardSnapshot, DashboardSurface, LogsSurface, NodesSurface, fetch_alerts,
    fetch_dashboard, fetch_logs, fetch_node_detail, fetch_nodes,
};
use crate::sync::PollOptions;

/// Cheaply cloneable handle to one backend.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    config: MonitorConfig,
    client: ApiClient,
}

impl Monitor {
    /// Build the HTTP client from `config`. Does not contact the backend.
    pub fn new(config: MonitorConfig) -> Result<Self, CoreError> {
        let client = ApiClient::new(config.api_url.clone(), &config.transport())?;
        Ok(Self::with_client(config, client))
    }

    /// Use a pre-built client (tests, shared connection pools).
    pub fn with_client(config: MonitorConfig, client: ApiClient) -> Self {
        debug!(api_url = %config.api_url, "monitor ready");
        Self {
            inner: Arc::new(MonitorInner { config, client }),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    // ── One-shot reads ───────────────────────────────────────────

    pub async fn health(&self) -> Result<Health, CoreError> {
        Ok(Health::from(self.inner.client.health().await?))
    }

    pub async fn system_status(&self) -> Result<SystemStatus, CoreError> {
        SystemStatus::try_from(self.inner.client.get_system_status().await?)
    }

    pub async fn nodes(&self) -> Result<Vec<Node>, CoreError> {
        fetch_nodes(&self.inner.client).await
    }

    pub async fn node_detail(&self, node_id: &NodeId) -> Result<NodeDetail, CoreError> {
        fetch_node_detail(&self.inner.client, node_id).await
    }

    /// All alerts, in canonical order.
    pub async fn alerts(&self) -> Result<Vec<Alert>, CoreError> {
        fetch_alerts(&self.inner.client).await
    }

    /// Look up one alert in the current listing.
    pub async fn alert(&self, alert_id: AlertId) -> Result<Alert, CoreError> {
        self.alerts()
            .await?
            .into_iter()
            .find(|alert| alert.alert_id == alert_id)
            .ok_or_else(|| CoreError::NotFound {
                resource: format!("alert {alert_id}"),
            })
    }

    pub async fn event_logs(&self) -> Result<Vec<EventLog>, CoreError> {
        fetch_logs(&self.inner.client).await
    }

    /// One all-or-nothing dashboard cycle.
    pub async fn dashboard(&self) -> Result<DashboardSnapshot, CoreError> {
        fetch_dashboard(&self.inner.client).await
    }

    // ── Live surfaces ────────────────────────────────────────────

    pub fn watch_dashboard(&self) -> DashboardSurface {
        let options = self.poll_options(self.inner.config.intervals.dashboard);
        DashboardSurface::start(self.inner.client.clone(), options)
    }

    pub fn watch_nodes(&self) -> NodesSurface {
        let options = self.poll_options(self.inner.config.intervals.nodes);
        NodesSurface::start(self.inner.client.clone(), options)
    }

    pub fn watch_alerts(&self) -> AlertsSurface {
        let options = self.poll_options(self.inner.config.intervals.alerts);
        AlertsSurface::start(self.inner.client.clone(), options)
    }

    pub fn watch_logs(&self) -> LogsSurface {
        let options = self.poll_options(self.inner.config.intervals.logs);
        LogsSurface::start(self.inner.client.clone(), options)
    }

    fn poll_options(&self, interval: Duration) -> PollOptions {
        PollOptions::every(interval).with_cycle_timeout(self.inner.config.cycle_timeout)
    }
}

