// ── Mutation coordinator ──
//
// Acknowledgment is the only write path. A successful command is never
// merged into local state: it forces the owning poller to re-read, and
// the alert flips only when the server says so.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use floodwatch_api::ApiClient;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::AlertId;
use crate::stream::ViewStream;
use crate::sync::polling::RefreshHandle;

/// What happened to an acknowledgment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckOutcome {
    /// The backend accepted it; a re-read has been requested.
    Sent,
    /// Another acknowledgment of the same alert is still in flight.
    AlreadyPending,
}

/// Issues operator commands and resynchronizes the owning poller.
pub struct MutationCoordinator {
    client: ApiClient,
    resync: RefreshHandle,
    last_error: watch::Sender<Option<CoreError>>,
    pending: Mutex<HashSet<AlertId>>,
}

impl MutationCoordinator {
    pub fn new(client: ApiClient, resync: RefreshHandle) -> Self {
        let (last_error, _) = watch::channel(None);
        Self {
            client,
            resync,
            last_error,
            pending: Mutex::new(HashSet::new()),
        }
    }

    /// Acknowledge one alert.
    ///
    /// On success the owning poller refreshes immediately. On failure
    /// the error is returned and published on [`errors()`](Self::errors);
    /// nothing local changes, so the alert stays unacknowledged.
    pub async fn acknowledge(&self, alert_id: AlertId) -> Result<AckOutcome, CoreError> {
        let Some(_guard) = PendingGuard::claim(&self.pending, alert_id) else {
            debug!(%alert_id, "acknowledgment already in flight");
            return Ok(AckOutcome::AlreadyPending);
        };

        match self.client.acknowledge_alert(alert_id.get()).await {
            Ok(()) => {
                info!(%alert_id, "alert acknowledged");
                self.last_error.send_replace(None);
                self.resync.refresh_now();
                Ok(AckOutcome::Sent)
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(%alert_id, error = %err, "acknowledgment failed");
                self.last_error.send_replace(Some(err.clone()));
                Err(err)
            }
        }
    }

    /// The most recent mutation error, cleared by the next success.
    pub fn last_error(&self) -> Option<CoreError> {
        self.last_error.borrow().clone()
    }

    /// Dismiss the published error.
    pub fn clear_error(&self) {
        self.last_error.send_if_modified(|e| e.take().is_some());
    }

    pub fn errors(&self) -> ViewStream<Option<CoreError>> {
        ViewStream::new(self.last_error.subscribe())
    }

    pub fn is_pending(&self, alert_id: AlertId) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&alert_id)
    }
}

/// Marks an alert as in flight until dropped, including on cancellation.
struct PendingGuard<'a> {
    pending: &'a Mutex<HashSet<AlertId>>,
    alert_id: AlertId,
}

impl<'a> PendingGuard<'a> {
    fn claim(pending: &'a Mutex<HashSet<AlertId>>, alert_id: AlertId) -> Option<Self> {
        // The lock must be released before a losing claim returns.
        let inserted = pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(alert_id);
        inserted.then(|| Self { pending, alert_id })
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.alert_id);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Mutex, PoisonError};

    use super::PendingGuard;
    use crate::model::AlertId;

    #[test]
    fn second_claim_on_same_alert_is_refused() {
        let pending = Mutex::new(HashSet::new());
        let first = PendingGuard::claim(&pending, AlertId::new(7));
        assert!(first.is_some());

        assert!(PendingGuard::claim(&pending, AlertId::new(7)).is_none());
        let held = pending.lock().unwrap_or_else(PoisonError::into_inner);
        assert!(held.contains(&AlertId::new(7)), "a refused claim must not release the first one");
        drop(held);

        assert!(PendingGuard::claim(&pending, AlertId::new(8)).is_some());
    }

    #[test]
    fn dropping_the_guard_frees_the_alert() {
        let pending = Mutex::new(HashSet::new());
        drop(PendingGuard::claim(&pending, AlertId::new(7)));
        assert!(PendingGuard::claim(&pending, AlertId::new(7)).is_some());
    }
}
