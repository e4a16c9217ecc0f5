// Alerts surface: ordered alert list plus the acknowledgment path.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use floodwatch_api::ApiClient;
use tracing::warn;

use crate::convert::convert_all;
use crate::error::CoreError;
use crate::model::{Alert, AlertId};
use crate::sync::{AckOutcome, MutationCoordinator, PollOptions, PollingController};
use crate::view::{AlertCounts, AlertFilter, Predicate, order_alerts};

pub(crate) async fn fetch_alerts(client: &ApiClient) -> Result<Vec<Alert>, CoreError> {
    let mut alerts: Vec<Alert> = convert_all(client.list_alerts().await?)?;
    order_alerts(&mut alerts);
    Ok(alerts)
}

/// Remembers which alerts have been seen acknowledged.
///
/// Acknowledgment is one-way. A later poll showing one of these as
/// unacknowledged is a backend contract violation: it is logged and the
/// server's answer is still displayed as-is.
#[derive(Debug, Default)]
struct AckLedger {
    acknowledged: Mutex<HashSet<AlertId>>,
}

impl AckLedger {
    fn observe(&self, alerts: &[Alert]) -> usize {
        let mut seen = self
            .acknowledged
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut regressions = 0;
        for alert in alerts {
            if alert.is_acknowledged {
                seen.insert(alert.alert_id);
            } else if seen.contains(&alert.alert_id) {
                regressions += 1;
                warn!(
                    alert_id = %alert.alert_id,
                    "backend reports a previously acknowledged alert as unacknowledged"
                );
            }
        }
        regressions
    }
}

/// Live alert list with acknowledgment.
pub struct AlertsSurface {
    poller: PollingController<Vec<Alert>>,
    mutations: MutationCoordinator,
}

impl AlertsSurface {
    pub fn start(client: ApiClient, options: PollOptions) -> Self {
        let ledger = Arc::new(AckLedger::default());
        let list_client = client.clone();
        let poller = PollingController::start("alerts", options, move || {
            let client = list_client.clone();
            let ledger = Arc::clone(&ledger);
            async move {
                let alerts = fetch_alerts(&client).await?;
                ledger.observe(&alerts);
                Ok::<_, CoreError>(alerts)
            }
        });
        let mutations = MutationCoordinator::new(client, poller.handle());
        Self { poller, mutations }
    }

    pub fn poller(&self) -> &PollingController<Vec<Alert>> {
        &self.poller
    }

    pub fn mutations(&self) -> &MutationCoordinator {
        &self.mutations
    }

    /// Acknowledge an alert and force a re-read on success.
    pub async fn acknowledge(&self, alert_id: AlertId) -> Result<AckOutcome, CoreError> {
        self.mutations.acknowledge(alert_id).await
    }

    /// Current alerts matching `filter`, in canonical order.
    pub fn filtered(&self, filter: &AlertFilter) -> Vec<Alert> {
        self.poller
            .state()
            .data
            .map(|alerts| filter.apply(&alerts))
            .unwrap_or_default()
    }

    pub fn counts(&self) -> AlertCounts {
        self.poller
            .state()
            .data
            .map(|alerts| AlertCounts::from_alerts(&alerts))
            .unwrap_or_default()
    }

    pub fn refresh_now(&self) {
        self.poller.refresh_now();
    }

    pub fn stop(&self) {
        self.poller.stop();
    }
}
