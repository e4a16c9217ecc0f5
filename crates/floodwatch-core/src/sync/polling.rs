// ── Periodic polling controller ──
//
// One driver task per controller owns the whole request lifecycle:
// timer ticks, manual refreshes, the single in-flight cycle, and the
// application of its result. Because every transition happens in that
// task, cycle N is applied before cycle N+1 can start.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use tokio::sync::{Notify, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info_span, warn};

use crate::error::CoreError;
use crate::stream::ViewStream;

/// Shortest cadence the driver will honor.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// One boxed fetch cycle.
pub type FetchFuture<T> = BoxFuture<'static, Result<T, CoreError>>;

type FetchFn<T> = Arc<dyn Fn() -> FetchFuture<T> + Send + Sync>;

// ── State ───────────────────────────────────────────────────────────

/// Observable state of one polled surface.
pub struct PollState<T> {
    /// Last successfully fetched data. Never cleared by a failed cycle.
    pub data: Option<Arc<T>>,
    /// `true` only until the first cycle completes.
    pub loading: bool,
    /// Error from the most recent cycle, cleared by the next success.
    pub error: Option<CoreError>,
    /// When `data` was last replaced.
    pub last_updated: Option<DateTime<Utc>>,
    /// Completed cycles, successful or not.
    pub cycles: u64,
}

impl<T> PollState<T> {
    /// Data is shown but the latest cycle failed.
    pub fn is_stale(&self) -> bool {
        self.data.is_some() && self.error.is_some()
    }
}

impl<T> Default for PollState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            last_updated: None,
            cycles: 0,
        }
    }
}

impl<T> Clone for PollState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            loading: self.loading,
            error: self.error.clone(),
            last_updated: self.last_updated,
            cycles: self.cycles,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PollState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollState")
            .field("data", &self.data)
            .field("loading", &self.loading)
            .field("error", &self.error)
            .field("last_updated", &self.last_updated)
            .field("cycles", &self.cycles)
            .finish()
    }
}

// ── Options ─────────────────────────────────────────────────────────

/// Cadence and time bound for a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub interval: Duration,
    /// Bound on one whole cycle. On expiry the cycle fails with
    /// [`CoreError::Timeout`]; a late success is dropped with it.
    pub cycle_timeout: Option<Duration>,
}

impl PollOptions {
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            cycle_timeout: None,
        }
    }

    pub fn with_cycle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.cycle_timeout = timeout;
        self
    }
}

// ── Refresh handle ──────────────────────────────────────────────────

/// Cloneable trigger for an out-of-band cycle on one controller.
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    refresh: Arc<Notify>,
    cancel: CancellationToken,
}

impl RefreshHandle {
    /// Request an immediate cycle without shifting the timer's phase.
    ///
    /// If a cycle is in flight, one follow-up cycle runs after it lands;
    /// repeated requests in the meantime coalesce. No-op once stopped.
    pub fn refresh_now(&self) {
        if !self.cancel.is_cancelled() {
            self.refresh.notify_one();
        }
    }
}

// ── Controller ──────────────────────────────────────────────────────

/// Periodic fetcher publishing [`PollState`] to subscribers.
///
/// Polling starts on construction and stops on [`stop()`](Self::stop)
/// or when the controller is dropped. Requires a Tokio runtime.
pub struct PollingController<T> {
    name: &'static str,
    state: Arc<watch::Sender<PollState<T>>>,
    refresh: RefreshHandle,
}

impl<T: Send + Sync + 'static> PollingController<T> {
    /// Spawn the driver and run the first cycle immediately.
    pub fn start<F, Fut>(name: &'static str, options: PollOptions, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        let fetch: FetchFn<T> = Arc::new(move || -> FetchFuture<T> { Box::pin(fetch()) });
        let (tx, _) = watch::channel(PollState {
            loading: true,
            ..PollState::default()
        });
        let state = Arc::new(tx);
        let refresh = RefreshHandle {
            refresh: Arc::new(Notify::new()),
            cancel: CancellationToken::new(),
        };

        debug!(
            surface = name,
            interval_ms = u64::try_from(options.interval.as_millis()).unwrap_or(u64::MAX),
            "starting poller"
        );
        tokio::spawn(
            drive(fetch, options, Arc::clone(&state), refresh.clone())
                .instrument(info_span!("poll", surface = name)),
        );

        Self {
            name,
            state,
            refresh,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> PollState<T> {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> ViewStream<PollState<T>> {
        ViewStream::new(self.state.subscribe())
    }

    pub(crate) fn receiver(&self) -> watch::Receiver<PollState<T>> {
        self.state.subscribe()
    }
}

impl<T> PollingController<T> {
    /// See [`RefreshHandle::refresh_now`].
    pub fn refresh_now(&self) {
        self.refresh.refresh_now();
    }

    /// A handle that can trigger refreshes from elsewhere.
    pub fn handle(&self) -> RefreshHandle {
        self.refresh.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.refresh.cancel.is_cancelled()
    }

    /// Stop polling. Idempotent.
    ///
    /// After this returns, `data` and `error` never change again: a
    /// response already in flight is discarded on arrival.
    pub fn stop(&self) {
        // Cancel under the channel's write lock; `apply` checks under the
        // same lock, so no result can land after stop returns.
        self.state.send_if_modified(|_| {
            if !self.refresh.cancel.is_cancelled() {
                debug!(surface = self.name, "stopping poller");
                self.refresh.cancel.cancel();
            }
            false
        });
    }
}

impl<T> Drop for PollingController<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

// ── Driver ──────────────────────────────────────────────────────────

async fn drive<T: Send + Sync + 'static>(
    fetch: FetchFn<T>,
    options: PollOptions,
    state: Arc<watch::Sender<PollState<T>>>,
    handle: RefreshHandle,
) {
    let mut ticker = tokio::time::interval(options.interval.max(MIN_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut in_flight: Option<FetchFuture<T>> = None;
    let mut follow_up = false;

    loop {
        tokio::select! {
            biased;

            () = handle.cancel.cancelled() => break,

            result = settle(&mut in_flight) => {
                in_flight = None;
                apply(&state, &handle.cancel, result);
                if std::mem::take(&mut follow_up) {
                    debug!("running coalesced refresh");
                    in_flight = Some(begin(&fetch, options.cycle_timeout));
                }
            }

            _ = ticker.tick() => {
                if in_flight.is_some() {
                    debug!("previous cycle still in flight, skipping tick");
                } else {
                    in_flight = Some(begin(&fetch, options.cycle_timeout));
                }
            }

            () = handle.refresh.notified() => {
                if in_flight.is_some() {
                    follow_up = true;
                } else {
                    debug!("manual refresh");
                    in_flight = Some(begin(&fetch, options.cycle_timeout));
                }
            }
        }
    }

    debug!("poller stopped");
}

/// Resolve the in-flight cycle, or pend forever when idle.
async fn settle<T>(slot: &mut Option<FetchFuture<T>>) -> Result<T, CoreError> {
    match slot {
        Some(cycle) => cycle.await,
        None => std::future::pending().await,
    }
}

fn begin<T: Send + 'static>(fetch: &FetchFn<T>, timeout: Option<Duration>) -> FetchFuture<T> {
    let cycle = fetch();
    match timeout {
        None => cycle,
        Some(limit) => Box::pin(async move {
            tokio::time::timeout(limit, cycle)
                .await
                .unwrap_or_else(|_elapsed| Err(CoreError::Timeout))
        }),
    }
}

fn apply<T>(
    state: &watch::Sender<PollState<T>>,
    cancel: &CancellationToken,
    result: Result<T, CoreError>,
) {
    state.send_if_modified(|s| {
        if cancel.is_cancelled() {
            debug!("discarding response that arrived after stop");
            return false;
        }
        s.loading = false;
        s.cycles += 1;
        match result {
            Ok(data) => {
                s.data = Some(Arc::new(data));
                s.error = None;
                s.last_updated = Some(Utc::now());
            }
            Err(e) => {
                warn!(error = %e, stale = s.data.is_some(), "poll cycle failed");
                s.error = Some(e);
            }
        }
        true
    });
}
