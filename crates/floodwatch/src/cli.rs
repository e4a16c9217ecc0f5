//! Clap derive structures for the `floodwatch` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only clap types appear here so `build.rs` can render man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// floodwatch -- operator console for a flood sensor network
#[derive(Debug, Parser)]
#[command(
    name = "floodwatch",
    version,
    about = "Monitor flood sensor nodes, alerts, and event logs",
    long_about = "An operator console for the Floodwatch backend.\n\n\
        Reads the /api/v1 REST API, acknowledges alerts, and can keep any\n\
        dashboard surface live with `floodwatch watch`.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "FLOODWATCH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root, e.g. http://127.0.0.1:8000/api/v1 (overrides profile)
    #[arg(long, short = 'u', env = "FLOODWATCH_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FLOODWATCH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "FLOODWATCH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "FLOODWATCH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show system status KPIs
    #[command(alias = "st")]
    Status,

    /// Check backend liveness
    Health,

    /// Browse monitoring nodes
    #[command(alias = "n")]
    Nodes(NodesArgs),

    /// Browse and acknowledge alerts
    #[command(alias = "a")]
    Alerts(AlertsArgs),

    /// Browse system event logs
    #[command(alias = "l")]
    Logs(LogsArgs),

    /// Keep a dashboard surface live until interrupted
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NODES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NodesArgs {
    #[command(subcommand)]
    pub command: NodesCommand,
}

#[derive(Debug, Subcommand)]
pub enum NodesCommand {
    /// List nodes, filtered and paginated
    #[command(alias = "ls")]
    List {
        /// Only nodes in this state
        #[arg(long, short = 's', default_value = "all")]
        status: StatusFilter,

        /// Only nodes running this firmware version
        #[arg(long, short = 'f')]
        firmware: Option<String>,

        /// Case-insensitive match on the node name
        #[arg(long)]
        search: Option<String>,

        /// 1-based page number (clamped to the last page)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Rows per page
        #[arg(long, default_value = "10")]
        per_page: usize,

        /// Print every matching node
        #[arg(long, conflicts_with_all = ["page", "per_page"])]
        all: bool,
    },

    /// Show node detail, recent readings, and a water-level sparkline
    #[command(alias = "get")]
    Show {
        /// Node ID (e.g. NODE-001)
        node_id: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusFilter {
    All,
    Online,
    Offline,
    Maintenance,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ALERTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AlertsArgs {
    #[command(subcommand)]
    pub command: AlertsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AlertsCommand {
    /// List alerts, unacknowledged first, newest first within each group
    #[command(alias = "ls")]
    List {
        /// Only alerts of this severity
        #[arg(long, short = 's', default_value = "all")]
        severity: SeverityFilter,

        /// Acknowledgment state
        #[arg(long, default_value = "all")]
        state: AckFilter,
    },

    /// Acknowledge an alert and print its state as re-read from the backend
    Ack {
        /// Alert ID
        alert_id: i64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SeverityFilter {
    All,
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AckFilter {
    All,
    Acknowledged,
    Unacknowledged,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LOGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LogsArgs {
    #[command(subcommand)]
    pub command: LogsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LogsCommand {
    /// List event logs
    #[command(alias = "ls")]
    List {
        /// Only entries at this level
        #[arg(long, short = 'l', default_value = "all")]
        level: LevelFilter,

        /// Case-insensitive match on the message
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LevelFilter {
    All,
    Info,
    Warn,
    Error,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WATCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Surface to keep live
    pub surface: WatchSurface,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WatchSurface {
    /// System KPIs and active alerts
    Dashboard,
    /// Node table
    Nodes,
    /// Alert panel
    Alerts,
    /// Event log
    Logs,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or extend the config file with guided setup
    ///
    /// Prompts for anything not given on the command line; pass
    /// `--api-url` and `--name` to run without prompts.
    Init {
        /// Profile name
        #[arg(long)]
        name: Option<String>,
    },

    /// Display current configuration
    Show,

    /// Print the config file location
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
