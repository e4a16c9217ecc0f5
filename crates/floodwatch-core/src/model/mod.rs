// ── Domain model ──
//
// Canonical entity shapes shared by every surface. No behavior beyond
// small derived accessors; wire decoding lives in `crate::convert`.

mod alert;
mod ids;
mod log;
mod node;
mod system;

pub use alert::{AckState, Alert, AlertSeverity};
pub use ids::{AlertId, LogId, NodeId, ReadingId};
pub use log::{EventLog, LogLevel};
pub use node::{LatestReading, Node, NodeDetail, NodeStatus, SensorReading};
pub use system::{Health, Kpis, SystemStatus};
