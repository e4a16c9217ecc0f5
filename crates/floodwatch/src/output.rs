//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use chrono::{DateTime, Local, Utc};
use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use floodwatch_core::view::project;
use floodwatch_core::{AlertSeverity, LogLevel, NodeStatus};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

pub fn paint_severity(severity: AlertSeverity, color: bool) -> String {
    let label = severity.to_string();
    if !color {
        return label;
    }
    match severity {
        AlertSeverity::Critical => label.red().bold().to_string(),
        AlertSeverity::Warning => label.yellow().to_string(),
        AlertSeverity::Info => label.cyan().to_string(),
    }
}

pub fn paint_status(status: NodeStatus, color: bool) -> String {
    let label = status.to_string();
    if !color {
        return label;
    }
    match status {
        NodeStatus::Online => label.green().to_string(),
        NodeStatus::Offline => label.red().to_string(),
        NodeStatus::Maintenance => label.yellow().to_string(),
    }
}

pub fn paint_level(level: LogLevel, color: bool) -> String {
    let label = level.to_string();
    if !color {
        return label;
    }
    match level {
        LogLevel::Error => label.red().to_string(),
        LogLevel::Warn => label.yellow().to_string(),
        LogLevel::Info => label.dimmed().to_string(),
    }
}

pub fn paint_dim(text: &str, color: bool) -> String {
    if color {
        text.dimmed().to_string()
    } else {
        text.to_owned()
    }
}

// ── Value formatting ─────────────────────────────────────────────────

pub fn format_time(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn format_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One-line block sparkline, oldest sample first.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::as_conversions
)]
pub fn sparkline(values: &[f64]) -> String {
    let top = (BARS.len() - 1) as f64;
    let width = values.len().saturating_sub(1) as f64;
    project(values, width, top)
        .map(|point| {
            // y grows downward; the highest sample sits at y = 0.
            let level = (top - point.y).round().clamp(0.0, top) as usize;
            BARS.get(level).copied().unwrap_or(' ')
        })
        .collect()
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the source data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since detail views don't use the `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    if compact {
        serde_json::to_string(data).expect("serialization should not fail")
    } else {
        serde_json::to_string_pretty(data).expect("serialization should not fail")
    }
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}
