// Logs surface: the event stream plus the expanded entry.
//
// Log detail needs no extra request: the selected entry is resolved from
// the surface's own latest snapshot.

use floodwatch_api::ApiClient;

use crate::convert::convert_all;
use crate::error::CoreError;
use crate::model::{EventLog, LogId};
use crate::sync::{PollOptions, PollingController, SelectionController};
use crate::view::{LogCounts, LogFilter, Predicate};

pub(crate) async fn fetch_logs(client: &ApiClient) -> Result<Vec<EventLog>, CoreError> {
    convert_all(client.list_event_logs().await?)
}

/// Live event log with a single expandable entry.
pub struct LogsSurface {
    poller: PollingController<Vec<EventLog>>,
    selection: SelectionController<LogId, EventLog>,
}

impl LogsSurface {
    pub fn start(client: ApiClient, options: PollOptions) -> Self {
        let poller = PollingController::start("logs", options, move || {
            let client = client.clone();
            async move { fetch_logs(&client).await }
        });

        let snapshot = poller.receiver();
        let selection = SelectionController::new(move |log_id: LogId| {
            let found = snapshot
                .borrow()
                .data
                .as_ref()
                .and_then(|logs| logs.iter().find(|log| log.log_id == log_id).cloned());
            async move {
                found.ok_or_else(|| CoreError::NotFound {
                    resource: format!("event log {log_id}"),
                })
            }
        });

        Self { poller, selection }
    }

    pub fn poller(&self) -> &PollingController<Vec<EventLog>> {
        &self.poller
    }

    pub fn selection(&self) -> &SelectionController<LogId, EventLog> {
        &self.selection
    }

    /// Expand `log_id`, or collapse it if already expanded.
    pub fn select(&self, log_id: LogId) -> bool {
        self.selection.select(log_id)
    }

    pub fn clear_selection(&self) {
        self.selection.clear();
    }

    /// Current entries matching `filter`, newest first.
    pub fn filtered(&self, filter: &LogFilter) -> Vec<EventLog> {
        self.poller
            .state()
            .data
            .map(|logs| filter.apply(&logs))
            .unwrap_or_default()
    }

    pub fn counts(&self) -> LogCounts {
        self.poller
            .state()
            .data
            .map(|logs| LogCounts::from_logs(&logs))
            .unwrap_or_default()
    }

    pub fn refresh_now(&self) {
        self.poller.refresh_now();
    }

    pub fn stop(&self) {
        self.poller.stop();
        self.selection.clear();
    }
}
