//! Sync and view-state layer between `floodwatch-api` and consumers.
//!
//! Mirrors backend state (nodes, alerts, event logs, aggregate status)
//! into observable view models kept fresh by polling:
//!
//! - **[`PollingController`]**: Per-surface engine: fixed cadence, one
//!   in-flight cycle at a time (ticks during a cycle are skipped), manual
//!   [`refresh_now()`](PollingController::refresh_now), stale-but-present
//!   data on failure, and no late writes after [`stop()`](PollingController::stop).
//!
//! - **[`SelectionController`]**: The single expanded entity with
//!   toggle-to-close and a detail fetch that can never be overwritten by
//!   a slower answer for an earlier selection.
//!
//! - **[`MutationCoordinator`]**: Alert acknowledgment followed by a
//!   forced re-read; never an optimistic local edit.
//!
//! - **Views** ([`view`]): Pure derivations: filters, canonical alert
//!   ordering, sparkline projection, pagination, and summary counters.
//!
//! - **[`Monitor`]**: Facade vending one-shot reads and live surfaces
//!   ([`DashboardSurface`], [`NodesSurface`], [`AlertsSurface`],
//!   [`LogsSurface`]), each exposing state through [`ViewStream`].

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod monitor;
pub mod stream;
pub mod surface;
pub mod sync;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{MonitorConfig, PollIntervals, TlsVerification};
pub use error::CoreError;
pub use monitor::Monitor;
pub use stream::ViewStream;
pub use surface::{AlertsSurface, DashboardSnapshot, DashboardSurface, LogsSurface, NodesSurface};
pub use sync::{
    AckOutcome, MutationCoordinator, PollOptions, PollState, PollingController, RefreshHandle,
    SelectionController, SelectionState,
};

pub use model::{
    AckState, Alert, AlertId, AlertSeverity, EventLog, Health, Kpis, LatestReading, LogId,
    LogLevel, Node, NodeDetail, NodeId, NodeStatus, ReadingId, SensorReading, SystemStatus,
};
