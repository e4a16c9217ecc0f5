//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use floodwatch_config::ConfigError;
use floodwatch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the backend at {url}: {reason}")]
    #[diagnostic(
        code(floodwatch::connection_failed),
        help(
            "Check that the backend is running and accessible.\n\
             URL: {url}\n\
             Try: floodwatch health --api-url http://127.0.0.1:8000/api/v1"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(floodwatch::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(floodwatch::not_found),
        help("Run: floodwatch {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(floodwatch::api_error))]
    ApiError { status: u16, message: String },

    #[error("Unexpected response from backend: {message}")]
    #[diagnostic(
        code(floodwatch::decode),
        help("The backend may be running an incompatible API version.")
    )]
    Decode { message: String },

    #[error("Backend reports status '{status}'")]
    #[diagnostic(code(floodwatch::unhealthy))]
    Unhealthy { status: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(floodwatch::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(floodwatch::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: floodwatch config init --name {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(floodwatch::config))]
    Config(ConfigError),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Network { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout => CliError::Timeout,

            CoreError::Server { status, message } => CliError::ApiError { status, message },

            CoreError::NotFound { resource } => not_found_for(&resource),

            CoreError::Decode { message } => CliError::Decode { message },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
        }
    }
}

/// Classify a not-found resource such as `/api/v1/nodes/NODE-9 (Node
/// not found)` or `alert 42` into a typed diagnostic.
fn not_found_for(resource: &str) -> CliError {
    let path = resource.split_once(" (").map_or(resource, |(path, _)| path);
    let segments: Vec<&str> = path
        .split(['/', ' '])
        .filter(|segment| !segment.is_empty())
        .collect();

    let classified = segments.windows(2).rev().find_map(|pair| match pair {
        [kind, id] => classify(kind).map(|found| (found, *id)),
        _ => None,
    });

    match classified {
        Some(((resource_type, list_command), identifier)) => CliError::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
            list_command: list_command.into(),
        },
        None => CliError::NotFound {
            resource_type: "resource".into(),
            identifier: path.into(),
            list_command: "status".into(),
        },
    }
}

fn classify(segment: &str) -> Option<(&'static str, &'static str)> {
    match segment {
        "nodes" | "node" => Some(("node", "nodes list")),
        "alerts" | "alert" => Some(("alert", "alerts list")),
        "logs" | "log" => Some(("event log", "logs list")),
        _ => None,
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => CliError::Config(other),
        }
    }
}
