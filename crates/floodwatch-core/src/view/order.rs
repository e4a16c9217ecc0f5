// ── Canonical alert ordering ──
//
// Unacknowledged alerts first, newest first within each group. Surfaces
// apply this once per fetch so every consumer agrees on the order.

use std::cmp::Ordering;

use crate::model::Alert;

/// Compare two alerts by acknowledgment state, then by timestamp descending.
pub fn compare_alerts(a: &Alert, b: &Alert) -> Ordering {
    a.is_acknowledged
        .cmp(&b.is_acknowledged)
        .then_with(|| b.timestamp.cmp(&a.timestamp))
}

/// Sort in place. Stable: ties keep their server order.
pub fn order_alerts(alerts: &mut [Alert]) {
    alerts.sort_by(compare_alerts);
}
