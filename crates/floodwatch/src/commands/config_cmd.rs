//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::Input;
use serde::Serialize;

use floodwatch_config::{Config, DEFAULT_PROFILE, Profile};
use floodwatch_core::config::DEFAULT_API_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# unable to render config: {e}"))
}

#[derive(Serialize)]
struct ProfileEntry<'a> {
    name: &'a str,
    api_url: &'a str,
    default: bool,
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: guided setup ──────────────────────────────────────
        ConfigCommand::Init { name } => {
            let config_path = config::config_path();
            let interactive = name.is_none() || global.api_url.is_none();
            if interactive {
                eprintln!("Floodwatch configuration");
                eprintln!("   Config path: {}\n", config_path.display());
            }

            let profile_name = match name {
                Some(name) => name,
                None => Input::new()
                    .with_prompt("Profile name")
                    .default(DEFAULT_PROFILE.to_owned())
                    .interact_text()
                    .map_err(prompt_err)?,
            };

            let api_url = match global.api_url.clone() {
                Some(url) => url,
                None => Input::new()
                    .with_prompt("API URL")
                    .default(DEFAULT_API_URL.to_owned())
                    .interact_text()
                    .map_err(prompt_err)?,
            };

            let profile = Profile {
                api_url,
                timeout: global.timeout,
                insecure: global.insecure.then_some(true),
                ..Profile::default()
            };

            let mut cfg = config::load_config_or_default();
            // Reject a bad URL before it lands on disk.
            floodwatch_config::profile_to_monitor_config(&profile, &cfg.defaults)?;

            cfg.profiles.insert(profile_name.clone(), profile);
            if cfg.profiles.len() == 1 || cfg.default_profile.is_none() {
                cfg.default_profile = Some(profile_name.clone());
            }
            let path = config::save_config(&cfg)?;

            if !global.quiet {
                eprintln!("✓ Configuration written to {}", path.display());
                eprintln!("  Profile: {profile_name}");
                eprintln!("\n  Test it: floodwatch --profile {profile_name} health");
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, format_config, |c| {
                c.default_profile.clone().unwrap_or_default()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let active = config::active_profile_name(global, &cfg);
            let entries: Vec<ProfileEntry<'_>> = cfg
                .profiles
                .iter()
                .map(|(name, profile)| ProfileEntry {
                    name,
                    api_url: &profile.api_url,
                    default: *name == active,
                })
                .collect();

            let out = output::render_single(
                &global.output,
                &entries,
                |entries| {
                    if entries.is_empty() {
                        return "No profiles configured. Create one with: floodwatch config init"
                            .into();
                    }
                    let mut out = String::new();
                    for entry in entries {
                        let marker = if entry.default { "*" } else { " " };
                        let _ = writeln!(out, "{marker} {:<16} {}", entry.name, entry.api_url);
                    }
                    out.trim_end().to_owned()
                },
                |entries| {
                    entries
                        .iter()
                        .map(|e| e.name.to_owned())
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) && name != DEFAULT_PROFILE {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}
