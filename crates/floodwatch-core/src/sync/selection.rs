// ── Selection with on-demand detail ──
//
// Tracks which entity is expanded and fetches its detail. Every select
// or clear bumps a generation counter under the state channel's lock; a
// detail response is applied only if the generation and the selected id
// still match, so a slow answer for an earlier click can never overwrite
// a later one.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::future::BoxFuture;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, debug_span, warn};

use crate::error::CoreError;
use crate::stream::ViewStream;

type ResolveFn<K, D> = Arc<dyn Fn(K) -> BoxFuture<'static, Result<D, CoreError>> + Send + Sync>;

/// Observable selection state.
pub struct SelectionState<K, D> {
    pub selected: Option<K>,
    pub detail: Option<Arc<D>>,
    /// A detail fetch for `selected` is outstanding.
    pub loading: bool,
    pub error: Option<CoreError>,
}

impl<K, D> Default for SelectionState<K, D> {
    fn default() -> Self {
        Self {
            selected: None,
            detail: None,
            loading: false,
            error: None,
        }
    }
}

impl<K: Clone, D> Clone for SelectionState<K, D> {
    fn clone(&self) -> Self {
        Self {
            selected: self.selected.clone(),
            detail: self.detail.clone(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }
}

impl<K: fmt::Debug, D: fmt::Debug> fmt::Debug for SelectionState<K, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionState")
            .field("selected", &self.selected)
            .field("detail", &self.detail)
            .field("loading", &self.loading)
            .field("error", &self.error)
            .finish()
    }
}

/// Owns "which entity is selected" for one surface.
///
/// At most one entity is selected at a time. Requires a Tokio runtime.
pub struct SelectionController<K, D> {
    state: Arc<watch::Sender<SelectionState<K, D>>>,
    generation: Arc<AtomicU64>,
    resolve: ResolveFn<K, D>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<K, D> SelectionController<K, D>
where
    K: Clone + PartialEq + fmt::Display + Send + Sync + 'static,
    D: Send + Sync + 'static,
{
    /// `resolve` fetches the detail for one id.
    pub fn new<F, Fut>(resolve: F) -> Self
    where
        F: Fn(K) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<D, CoreError>> + Send + 'static,
    {
        let (tx, _) = watch::channel(SelectionState::default());
        Self {
            state: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
            resolve: Arc::new(move |id| -> BoxFuture<'static, Result<D, CoreError>> {
                Box::pin(resolve(id))
            }),
            task: Mutex::new(None),
        }
    }

    /// Select `id`, or close it if it is already selected.
    ///
    /// Returns `true` when `id` is now selected. Opening clears the
    /// previous detail and starts a detail fetch.
    pub fn select(&self, id: K) -> bool {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);

        let mut opened = None;
        self.state.send_modify(|s| {
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            if s.selected.as_ref() == Some(&id) {
                debug!(%id, "closing selection");
                *s = SelectionState::default();
            } else {
                *s = SelectionState {
                    selected: Some(id.clone()),
                    detail: None,
                    loading: true,
                    error: None,
                };
                opened = Some(generation);
            }
        });

        if let Some(previous) = task.take() {
            previous.abort();
        }
        if let Some(generation) = opened {
            *task = Some(self.spawn_fetch(id, generation));
        }
        opened.is_some()
    }

    /// Close the selection and discard any in-flight detail fetch.
    pub fn clear(&self) {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        self.state.send_if_modified(|s| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            let had_selection = s.selected.is_some();
            *s = SelectionState::default();
            had_selection
        });
        if let Some(previous) = task.take() {
            previous.abort();
        }
    }

    pub fn selected(&self) -> Option<K> {
        self.state.borrow().selected.clone()
    }

    pub fn state(&self) -> SelectionState<K, D> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> ViewStream<SelectionState<K, D>> {
        ViewStream::new(self.state.subscribe())
    }

    fn spawn_fetch(&self, id: K, generation: u64) -> JoinHandle<()> {
        let fetch = (self.resolve)(id.clone());
        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.generation);
        let span = debug_span!("detail", %id);

        tokio::spawn(
            async move {
                let result = fetch.await;
                state.send_if_modified(|s| {
                    if current.load(Ordering::SeqCst) != generation
                        || s.selected.as_ref() != Some(&id)
                    {
                        debug!("discarding stale detail response");
                        return false;
                    }
                    s.loading = false;
                    match result {
                        Ok(detail) => {
                            s.detail = Some(Arc::new(detail));
                            s.error = None;
                        }
                        Err(e) => {
                            warn!(error = %e, "detail fetch failed");
                            s.error = Some(e);
                        }
                    }
                    true
                });
            }
            .instrument(span),
        )
    }
}

impl<K, D> Drop for SelectionController<K, D> {
    fn drop(&mut self) {
        let task = self
            .task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.abort();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;

    /// Detail is `"detail:<id>"`, arriving after `delay(id)` seconds.
    fn controller(delay: fn(&str) -> u64) -> SelectionController<String, String> {
        SelectionController::new(move |id: String| async move {
            sleep(Duration::from_secs(delay(&id))).await;
            if id == "missing" {
                Err(CoreError::NotFound {
                    resource: format!("/api/v1/nodes/{id}"),
                })
            } else {
                Ok(format!("detail:{id}"))
            }
        })
    }

    fn detail(selection: &SelectionController<String, String>) -> Option<String> {
        selection.state().detail.map(|d| (*d).clone())
    }

    #[tokio::test(start_paused = true)]
    async fn selecting_twice_toggles_closed() {
        let selection = controller(|_| 1);

        assert!(selection.select("X".into()));
        assert!(selection.state().loading);
        sleep(Duration::from_secs(2)).await;
        assert_eq!(detail(&selection).as_deref(), Some("detail:X"));
        assert!(!selection.state().loading);

        assert!(!selection.select("X".into()));
        let state = selection.state();
        assert_eq!(state.selected, None);
        assert_eq!(state.detail, None);
    }

    #[tokio::test(start_paused = true)]
    async fn fast_reselect_shows_only_the_latest_detail() {
        let selection = controller(|id| if id == "X" { 10 } else { 1 });

        selection.select("X".into());
        selection.select("Y".into());

        sleep(Duration::from_secs(2)).await;
        assert_eq!(detail(&selection).as_deref(), Some("detail:Y"));

        sleep(Duration::from_secs(20)).await;
        assert_eq!(selection.selected().as_deref(), Some("Y"));
        assert_eq!(detail(&selection).as_deref(), Some("detail:Y"));
    }

    #[tokio::test(start_paused = true)]
    async fn earlier_response_never_fills_a_later_selection() {
        let selection = controller(|id| if id == "X" { 1 } else { 10 });

        selection.select("X".into());
        selection.select("Y".into());

        sleep(Duration::from_secs(5)).await;
        let state = selection.state();
        assert_eq!(state.selected.as_deref(), Some("Y"));
        assert_eq!(state.detail, None);
        assert!(state.loading);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(detail(&selection).as_deref(), Some("detail:Y"));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_detail_keeps_selection_and_surfaces_error() {
        let selection = controller(|_| 0);

        selection.select("missing".into());
        sleep(Duration::from_secs(1)).await;

        let state = selection.state();
        assert_eq!(state.selected.as_deref(), Some("missing"));
        assert!(!state.loading);
        assert!(state.error.unwrap().is_not_found());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_discards_in_flight_detail() {
        let selection = controller(|_| 5);

        selection.select("X".into());
        selection.clear();
        sleep(Duration::from_secs(10)).await;

        let state = selection.state();
        assert_eq!(state.selected, None);
        assert_eq!(state.detail, None);
        assert!(!state.loading);
    }
}
