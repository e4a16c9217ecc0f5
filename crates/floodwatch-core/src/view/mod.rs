// ── View derivations ──
//
// Pure functions from raw snapshots to presentation-ready lists. Nothing
// here holds state or touches the network; surfaces call these once per
// applied poll and presentation code reads the results.

pub mod filter;
pub mod order;
pub mod page;
pub mod sparkline;
pub mod summary;

pub use filter::{AlertFilter, Criterion, LogFilter, NodeFilter, Predicate, TextQuery};
pub use order::{compare_alerts, order_alerts};
pub use page::{DEFAULT_PAGE_SIZE, Page, paginate};
pub use sparkline::{Point, Projection, nearest_index, project};
pub use summary::{AlertCounts, LogCounts, NodeCounts, firmware_versions};
