//! Shared configuration for Floodwatch tools.
//!
//! TOML profiles (one per backend), layered loading via figment
//! (defaults, then `config.toml`, then `FLOODWATCH_` environment), and
//! translation to `floodwatch_core::MonitorConfig`. The CLI adds flag
//! overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use floodwatch_core::config::DEFAULT_API_URL;
use floodwatch_core::{MonitorConfig, PollIntervals, TlsVerification};

/// Profile used when neither a flag nor `default_profile` names one.
pub const DEFAULT_PROFILE: &str = "default";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Pick the active profile name: explicit flag, then
    /// `default_profile`, then `"default"`.
    pub fn active_profile_name(&self, flag: Option<&str>) -> String {
        flag.map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| DEFAULT_PROFILE.into())
    }

    /// Look up a profile. The `"default"` profile falls back to a local
    /// backend when it is not configured, so a fresh install just works.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        match self.profiles.get(name) {
            Some(profile) => Ok(profile.clone()),
            None if name == DEFAULT_PROFILE => Ok(Profile::default()),
            None => Err(ConfigError::UnknownProfile { name: name.into() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_poll_interval")]
    pub dashboard_interval_ms: u64,

    #[serde(default = "default_poll_interval")]
    pub nodes_interval_ms: u64,

    #[serde(default = "default_poll_interval")]
    pub alerts_interval_ms: u64,

    #[serde(default = "default_logs_interval")]
    pub logs_interval_ms: u64,

    /// Upper bound on one poll cycle; unset waits indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_timeout_ms: Option<u64>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            dashboard_interval_ms: default_poll_interval(),
            nodes_interval_ms: default_poll_interval(),
            alerts_interval_ms: default_poll_interval(),
            logs_interval_ms: default_logs_interval(),
            cycle_timeout_ms: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_poll_interval() -> u64 {
    30_000
}
fn default_logs_interval() -> u64 {
    10_000
}

/// A named backend profile. Unset fields fall back to [`Defaults`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// API root including the version prefix.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Path to custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_interval_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes_interval_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerts_interval_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs_interval_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_timeout_ms: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            ca_cert: None,
            insecure: None,
            timeout: None,
            dashboard_interval_ms: None,
            nodes_interval_ms: None,
            alerts_interval_ms: None,
            logs_interval_ms: None,
            cycle_timeout_ms: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "floodwatch", "floodwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("floodwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from a specific file + environment. A missing file is not an
/// error: defaults and environment still apply.
///
/// Environment keys nest with a double underscore, e.g.
/// `FLOODWATCH_DEFAULTS__TIMEOUT=5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FLOODWATCH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

/// Serialize config to TOML and write it to `path`, creating parents.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation to core config ──────────────────────────────────────

/// Build a `MonitorConfig` from a profile and the global defaults.
pub fn profile_to_monitor_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<MonitorConfig, ConfigError> {
    let api_url: url::Url = profile
        .api_url
        .parse()
        .map_err(|e| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL '{}': {e}", profile.api_url),
        })?;
    if !matches!(api_url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("expected an http(s) URL, got '{}'", profile.api_url),
        });
    }

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let interval = |field: &str, value: u64| -> Result<Duration, ConfigError> {
        if value == 0 {
            return Err(ConfigError::Validation {
                field: field.into(),
                reason: "poll interval must be greater than zero".into(),
            });
        }
        Ok(Duration::from_millis(value))
    };

    Ok(MonitorConfig {
        api_url,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        intervals: PollIntervals {
            dashboard: interval(
                "dashboard_interval_ms",
                profile
                    .dashboard_interval_ms
                    .unwrap_or(defaults.dashboard_interval_ms),
            )?,
            nodes: interval(
                "nodes_interval_ms",
                profile.nodes_interval_ms.unwrap_or(defaults.nodes_interval_ms),
            )?,
            alerts: interval(
                "alerts_interval_ms",
                profile.alerts_interval_ms.unwrap_or(defaults.alerts_interval_ms),
            )?,
            logs: interval(
                "logs_interval_ms",
                profile.logs_interval_ms.unwrap_or(defaults.logs_interval_ms),
            )?,
        },
        cycle_timeout: profile
            .cycle_timeout_ms
            .or(defaults.cycle_timeout_ms)
            .map(Duration::from_millis),
    })
}
