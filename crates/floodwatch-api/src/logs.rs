// Event log endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::EventLogResponse;

impl ApiClient {
    /// Latest event log entries (newest first, at most 50).
    ///
    /// `GET /logs/events`
    pub async fn list_event_logs(&self) -> Result<Vec<EventLogResponse>, Error> {
        let url = self.endpoint(&["logs", "events"])?;
        debug!("listing event logs");
        self.get(url).await
    }
}
