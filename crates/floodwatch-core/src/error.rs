// ── Core error types ──
//
// Display-ready errors published on surface state. These are NOT
// API-specific: consumers never see reqwest errors or raw bodies.
// The `From<floodwatch_api::Error>` impl folds transport-layer failures
// into a small set of kinds. Errors are `Clone` so a single failure can
// sit in a watch snapshot and be returned to the caller at once.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Sync errors ──────────────────────────────────────────────────
    /// The backend could not be reached (connection refused, DNS, TLS).
    #[error("Cannot reach backend at {url}: {reason}")]
    Network { url: String, reason: String },

    /// A request or poll cycle exceeded its time bound.
    #[error("Request timed out")]
    Timeout,

    /// The backend answered with a non-2xx status.
    #[error("Server returned HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// The backend reported HTTP 404 for a resource.
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// The payload did not match the expected shape or vocabulary.
    #[error("Unexpected response from backend: {message}")]
    Decode { message: String },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },
}

impl CoreError {
    /// Whether the next scheduled poll cycle may reasonably succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout => true,
            Self::Server { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<floodwatch_api::Error> for CoreError {
    fn from(err: floodwatch_api::Error) -> Self {
        match err {
            floodwatch_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_decode() {
                    CoreError::decode(e.to_string())
                } else if let Some(status) = e.status() {
                    CoreError::Server {
                        status: status.as_u16(),
                        message: e.to_string(),
                    }
                } else {
                    CoreError::Network {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            floodwatch_api::Error::InvalidBaseUrl { url } => CoreError::Config {
                message: format!("Base URL cannot carry API paths: {url}"),
            },
            floodwatch_api::Error::Tls(reason) => CoreError::Network {
                url: String::new(),
                reason: format!("TLS error: {reason}"),
            },
            floodwatch_api::Error::NotFound { path, message } => CoreError::NotFound {
                resource: if message.is_empty() {
                    path
                } else {
                    format!("{path} ({message})")
                },
            },
            floodwatch_api::Error::Http { status, message } => {
                CoreError::Server { status, message }
            }
            floodwatch_api::Error::Deserialization { message, body: _ } => {
                CoreError::Decode { message }
            }
        }
    }
}
