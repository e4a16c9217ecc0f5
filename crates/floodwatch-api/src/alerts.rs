// Alert endpoints
//
// Listing plus the one write path the backend exposes: acknowledgment.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::AlertResponse;

impl ApiClient {
    /// List all alerts.
    ///
    /// `GET /alerts`
    pub async fn list_alerts(&self) -> Result<Vec<AlertResponse>, Error> {
        let url = self.endpoint(&["alerts"])?;
        debug!("listing alerts");
        self.get(url).await
    }

    /// Acknowledge one alert.
    ///
    /// `POST /alerts/{alert_id}/ack`
    ///
    /// The backend echoes the updated alert, but callers should treat the
    /// next `list_alerts` as authoritative; the body is only decoded
    /// loosely so an empty 2xx still counts as success.
    pub async fn acknowledge_alert(&self, alert_id: i64) -> Result<(), Error> {
        let id = alert_id.to_string();
        let url = self.endpoint(&["alerts", &id, "ack"])?;
        debug!(alert_id, "acknowledging alert");
        let _: serde_json::Value = match self.post_empty(url).await {
            Ok(body) => body,
            Err(Error::Deserialization { body, .. }) if body.trim().is_empty() => {
                serde_json::Value::Null
            }
            Err(e) => return Err(e),
        };
        Ok(())
    }
}
