// ── Filter predicates for snapshots ──
//
// Criteria are independent predicates combined with AND. Each equality
// criterion has an explicit "no constraint" state, parsed from the
// `all` sentinel the dashboard's dropdowns use.

use std::fmt;
use std::str::FromStr;

use crate::model::{AckState, Alert, AlertSeverity, EventLog, LogLevel, Node, NodeStatus};

/// Sentinel accepted by [`Criterion::from_str`] for "no constraint".
pub const ALL: &str = "all";

/// Something that can decide whether an item belongs in a filtered view.
pub trait Predicate<T> {
    fn matches(&self, item: &T) -> bool;

    /// Keep the matching items, preserving input order.
    fn apply(&self, items: &[T]) -> Vec<T>
    where
        T: Clone,
    {
        items.iter().filter(|item| self.matches(item)).cloned().collect()
    }
}

// ── Criterion ───────────────────────────────────────────────────────

/// An equality constraint that may be switched off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Criterion<T> {
    #[default]
    Any,
    Is(T),
}

impl<T: PartialEq> Criterion<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Self::Any => true,
            Self::Is(expected) => expected == value,
        }
    }

    /// Like [`admits`](Self::admits) for fields the entity may lack.
    /// A missing value only passes an unconstrained criterion.
    pub fn admits_opt(&self, value: Option<&T>) -> bool {
        match (self, value) {
            (Self::Any, _) => true,
            (Self::Is(expected), Some(value)) => expected == value,
            (Self::Is(_), None) => false,
        }
    }
}

impl<T: FromStr> FromStr for Criterion<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(ALL) {
            Ok(Self::Any)
        } else {
            s.parse().map(Self::Is)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Criterion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str(ALL),
            Self::Is(value) => value.fmt(f),
        }
    }
}

// ── TextQuery ───────────────────────────────────────────────────────

/// Case-insensitive substring match. An empty query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextQuery(String);

impl TextQuery {
    pub fn new(query: &str) -> Self {
        Self(query.trim().to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, haystack: &str) -> bool {
        self.is_empty() || haystack.to_lowercase().contains(&self.0)
    }
}

impl From<&str> for TextQuery {
    fn from(query: &str) -> Self {
        Self::new(query)
    }
}

// ── Nodes ───────────────────────────────────────────────────────────

/// Node table criteria: status, firmware version, and name search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeFilter {
    pub status: Criterion<NodeStatus>,
    pub firmware: Criterion<String>,
    pub search: TextQuery,
}

impl Predicate<Node> for NodeFilter {
    fn matches(&self, node: &Node) -> bool {
        self.status.admits(&node.status)
            && self.firmware.admits_opt(node.firmware_version.as_ref())
            && self.search.matches(&node.name)
    }
}

// ── Alerts ──────────────────────────────────────────────────────────

/// Alert panel criteria: severity and acknowledgment state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertFilter {
    pub severity: Criterion<AlertSeverity>,
    pub state: Criterion<AckState>,
}

impl AlertFilter {
    /// Only alerts still awaiting an operator.
    pub fn unacknowledged() -> Self {
        Self {
            state: Criterion::Is(AckState::Unacknowledged),
            ..Self::default()
        }
    }
}

impl Predicate<Alert> for AlertFilter {
    fn matches(&self, alert: &Alert) -> bool {
        self.severity.admits(&alert.severity) && self.state.admits(&alert.ack_state())
    }
}

// ── Logs ────────────────────────────────────────────────────────────

/// Event log criteria: level and message search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub level: Criterion<LogLevel>,
    pub search: TextQuery,
}

impl Predicate<EventLog> for LogFilter {
    fn matches(&self, log: &EventLog) -> bool {
        self.level.admits(&log.log_level) && self.search.matches(&log.message)
    }
}
