//! Async client for the Floodwatch monitoring backend.
//!
//! Speaks the `/api/v1` REST surface: system status, nodes with their
//! latest sensor reading, per-node detail with recent readings, alerts
//! (and their acknowledgment), and the event log stream. Every method
//! returns raw wire types from [`models`]; `floodwatch-core` converts
//! them into the canonical domain model.

pub mod client;
pub mod error;
pub mod models;
pub mod timestamp;
pub mod transport;

mod alerts;
mod logs;
mod nodes;
mod system;

pub use client::ApiClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
