// ── Reactive view streams ──
//
// Subscription handle for any published view state (poll state,
// selection state, mutation errors).

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// A subscription to an observable piece of view state.
///
/// Provides both point-in-time snapshot access and change notification
/// via [`changed()`](Self::changed) or by converting to a `Stream`.
pub struct ViewStream<T: Clone + Send + Sync + 'static> {
    current: T,
    receiver: watch::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> ViewStream<T> {
    pub(crate) fn new(mut receiver: watch::Receiver<T>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// The snapshot seen at creation or at the last `changed()`.
    pub fn current(&self) -> &T {
        &self.current
    }

    /// The latest snapshot (may have changed since `current`).
    pub fn latest(&self) -> T {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` once the publisher has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    /// The first item is the current snapshot.
    pub fn into_stream(self) -> ViewWatchStream<T> {
        ViewWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct ViewWatchStream<T: Clone + Send + Sync + 'static> {
    inner: WatchStream<T>,
}

impl<T: Clone + Send + Sync + 'static> Stream for ViewWatchStream<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
