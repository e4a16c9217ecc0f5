// ── Runtime monitor configuration ──
//
// Describes *how* to reach the backend and how often each surface polls.
// Never touches disk: the CLI builds a `MonitorConfig` from its profile
// and flags and hands it in.

use std::time::Duration;

use url::Url;

/// Default API root for a locally running backend.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api/v1";

/// Default cadence for the dashboard, nodes, and alerts surfaces.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(30_000);

/// Default cadence for the (higher-frequency) logs surface.
pub const DEFAULT_LOGS_POLL_INTERVAL: Duration = Duration::from_millis(10_000);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed lab deployments).
    DangerAcceptInvalid,
}

/// Poll cadence per surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    pub dashboard: Duration,
    pub nodes: Duration,
    pub alerts: Duration,
    pub logs: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            dashboard: DEFAULT_POLL_INTERVAL,
            nodes: DEFAULT_POLL_INTERVAL,
            alerts: DEFAULT_POLL_INTERVAL,
            logs: DEFAULT_LOGS_POLL_INTERVAL,
        }
    }
}

/// Configuration for talking to a single backend.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// API root including the version prefix (e.g. `http://host:8000/api/v1`).
    pub api_url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Poll cadence for each surface.
    pub intervals: PollIntervals,
    /// Upper bound on one whole poll cycle. `None` waits indefinitely,
    /// leaving the surface in its loading/stale state until the request
    /// resolves or the surface is stopped.
    pub cycle_timeout: Option<Duration>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            intervals: PollIntervals::default(),
            cycle_timeout: None,
        }
    }
}

impl MonitorConfig {
    /// Shorthand for a default config pointed at another backend.
    pub fn with_api_url(api_url: Url) -> Self {
        Self {
            api_url,
            ..Self::default()
        }
    }

    pub(crate) fn transport(&self) -> floodwatch_api::TransportConfig {
        floodwatch_api::TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => floodwatch_api::TlsMode::System,
                TlsVerification::CustomCa(path) => floodwatch_api::TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => {
                    floodwatch_api::TlsMode::DangerAcceptInvalid
                }
            },
            timeout: self.timeout,
        }
    }
}
