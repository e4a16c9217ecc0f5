use thiserror::Error;

/// Top-level error type for the `floodwatch-api` crate.
///
/// Covers every failure mode of a single HTTP exchange with the backend:
/// transport, non-2xx status, and payload decoding. `floodwatch-core`
/// maps these into display-ready sync errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The configured base URL cannot carry path segments (e.g. `mailto:`).
    #[error("Base URL cannot be used for API requests: {url}")]
    InvalidBaseUrl { url: String },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── HTTP status ─────────────────────────────────────────────────
    /// The requested resource does not exist (HTTP 404).
    #[error("Not found: {path}")]
    NotFound { path: String, message: String },

    /// Any other non-2xx response.
    #[error("Server returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying on the
    /// next poll cycle.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// The HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
