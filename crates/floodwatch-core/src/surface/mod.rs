// ── Surfaces ──
//
// One surface per consumer-facing view. Each owns its controllers
// exclusively; nothing crosses between surfaces. Dropping a surface
// stops its poller and abandons any in-flight detail fetch.

mod alerts;
mod dashboard;
mod logs;
mod nodes;

pub use alerts::AlertsSurface;
pub use dashboard::{DashboardSnapshot, DashboardSurface};
pub use logs::LogsSurface;
pub use nodes::NodesSurface;

pub(crate) use alerts::fetch_alerts;
pub(crate) use dashboard::fetch_dashboard;
pub(crate) use logs::fetch_logs;
pub(crate) use nodes::{fetch_node_detail, fetch_nodes};
