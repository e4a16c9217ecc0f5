// ── Event log domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ids::LogId;

/// Event log level. Wire strings are upper case.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// One system event. Append-only from the client's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    pub log_id: LogId,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub log_level: LogLevel,
    pub message: String,
}
