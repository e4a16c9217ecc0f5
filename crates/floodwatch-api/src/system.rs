// System endpoints
//
// Liveness probe and the aggregate status counters shown as dashboard KPIs.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{HealthResponse, SystemStatusResponse};

impl ApiClient {
    /// Backend liveness probe.
    ///
    /// `GET /health`
    pub async fn health(&self) -> Result<HealthResponse, Error> {
        let url = self.endpoint(&["health"])?;
        debug!("probing backend health");
        self.get(url).await
    }

    /// Aggregate counters: nodes online/total, active alerts, mean latency.
    ///
    /// `GET /system/status`
    pub async fn get_system_status(&self) -> Result<SystemStatusResponse, Error> {
        let url = self.endpoint(&["system", "status"])?;
        debug!("fetching system status");
        self.get(url).await
    }
}
