//! `status` and `health` handlers.

use std::fmt::Write as _;

use floodwatch_core::{DashboardSnapshot, Kpis, Monitor};
use owo_colors::OwoColorize;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// KPI card block shared with `watch dashboard`.
pub fn format_kpis(kpis: &Kpis) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Nodes online:     {}", kpis.nodes_online);
    let _ = writeln!(out, "Active alerts:    {}", kpis.active_alerts);
    let _ = write!(out, "Network latency:  {}", kpis.network_latency);
    out
}

pub async fn handle_status(monitor: &Monitor, global: &GlobalOpts) -> Result<(), CliError> {
    let status = monitor.system_status().await?;
    let kpis = status.kpis();
    let out = output::render_single(&global.output, &status, |_| format_kpis(&kpis), |s| {
        format!("{} {} {}", s.nodes_online, s.nodes_total, s.active_alerts)
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle_health(monitor: &Monitor, global: &GlobalOpts) -> Result<(), CliError> {
    let health = monitor.health().await?;
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &health,
        |h| {
            let label = if color && h.is_ok() {
                h.status.green().to_string()
            } else {
                h.status.clone()
            };
            format!("Backend {}: {label}", monitor.config().api_url)
        },
        |h| h.status.clone(),
    );
    output::print_output(&out, global.quiet);

    if health.is_ok() {
        Ok(())
    } else {
        Err(CliError::Unhealthy {
            status: health.status,
        })
    }
}

/// Dashboard detail view: KPI cards, node counts, and active alerts.
pub fn format_dashboard(snapshot: &DashboardSnapshot, color: bool) -> String {
    let mut out = format_kpis(&snapshot.kpis());
    let counts = snapshot.node_counts();
    let _ = write!(
        out,
        "\nNodes:            {} online, {} offline, {} maintenance",
        counts.online, counts.offline, counts.maintenance
    );

    if snapshot.active_alerts.is_empty() {
        let _ = write!(out, "\n\n{}", output::paint_dim("No active alerts", color));
    } else {
        let rows: Vec<_> = snapshot
            .active_alerts
            .iter()
            .map(super::alerts::AlertRow::from)
            .collect();
        let _ = write!(out, "\n\nActive alerts\n{}", output::render_table(&rows));
    }
    out
}
