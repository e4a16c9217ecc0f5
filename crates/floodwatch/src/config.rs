//! Profile resolution: config file + global flags -> `MonitorConfig`.
//!
//! Core never sees these types -- it receives a pre-built `MonitorConfig`.

use floodwatch_config::{Config, Profile};
use floodwatch_core::MonitorConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use floodwatch_config::{config_path, load_config_or_default, save_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Build a `MonitorConfig` from the config file, profile, and CLI overrides.
///
/// This is the single boundary where CLI config types cross into core types.
pub fn build_monitor_config(global: &GlobalOpts) -> Result<MonitorConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profile(&profile_name) {
        Ok(profile) => profile,
        // An explicit URL is enough to run without a stored profile.
        Err(_) if global.api_url.is_some() => Profile::default(),
        Err(_) => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
    };

    resolve_profile(profile, &cfg, global)
}

/// Apply flag overrides (flag > env > profile > defaults) and translate.
pub fn resolve_profile(
    mut profile: Profile,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<MonitorConfig, CliError> {
    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }

    let monitor = floodwatch_config::profile_to_monitor_config(&profile, &cfg.defaults)?;
    tracing::debug!(api_url = %monitor.api_url, "resolved backend");
    Ok(monitor)
}

/// Comma-separated profile names for diagnostics.
pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
