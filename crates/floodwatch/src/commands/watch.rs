//! `watch`: drive one surface's poller and print every applied cycle
//! until Ctrl-C.

use std::fmt::Write as _;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use floodwatch_core::view::{AlertCounts, LogCounts, NodeCounts};
use floodwatch_core::{Alert, EventLog, Monitor, Node, PollState, ViewStream};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs, WatchSurface};
use crate::error::CliError;
use crate::output;

use super::alerts::AlertRow;
use super::logs::LogRow;
use super::nodes::NodeRow;
use super::status;

pub async fn handle(monitor: &Monitor, args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let intervals = monitor.config().intervals;
    let color = output::should_color(&global.color);

    match args.surface {
        WatchSurface::Dashboard => {
            let surface = monitor.watch_dashboard();
            announce("dashboard", intervals.dashboard, global);
            follow(
                "dashboard",
                surface.poller().subscribe(),
                global,
                |snap| status::format_dashboard(snap, color),
                |snap| snap.kpis().nodes_online,
            )
            .await
        }
        WatchSurface::Nodes => {
            let surface = monitor.watch_nodes();
            announce("nodes", intervals.nodes, global);
            follow(
                "nodes",
                surface.poller().subscribe(),
                global,
                |nodes| node_table(nodes),
                |nodes| join_ids(nodes.iter().map(|n| n.node_id.to_string())),
            )
            .await
        }
        WatchSurface::Alerts => {
            let surface = monitor.watch_alerts();
            announce("alerts", intervals.alerts, global);
            follow(
                "alerts",
                surface.poller().subscribe(),
                global,
                |alerts| alert_table(alerts),
                |alerts| join_ids(alerts.iter().map(|a| a.alert_id.to_string())),
            )
            .await
        }
        WatchSurface::Logs => {
            let surface = monitor.watch_logs();
            announce("logs", intervals.logs, global);
            follow(
                "logs",
                surface.poller().subscribe(),
                global,
                |logs| log_table(logs),
                |logs| join_ids(logs.iter().map(|l| l.log_id.to_string())),
            )
            .await
        }
    }
}

fn announce(name: &str, interval: Duration, global: &GlobalOpts) {
    if !global.quiet {
        eprintln!(
            "Watching {name} every {} (Ctrl-C to stop)",
            humantime::format_duration(interval)
        );
    }
}

/// Print each completed cycle until interrupted or the poller goes away.
///
/// Cycles that fail leave the previous data in place; only a warning is
/// printed for them.
async fn follow<T>(
    name: &str,
    mut states: ViewStream<PollState<T>>,
    global: &GlobalOpts,
    detail: impl Fn(&T) -> String,
    plain: impl Fn(&T) -> String,
) -> Result<(), CliError>
where
    T: Serialize + Send + Sync + 'static,
{
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            biased;
            res = &mut interrupt => {
                res?;
                info!(surface = name, "watch interrupted");
                break;
            }
            next = states.changed() => {
                let Some(state) = next else { break };
                print_cycle(name, &state, global, &detail, &plain);
            }
        }
    }
    Ok(())
}

fn print_cycle<T: Serialize>(
    name: &str,
    state: &PollState<T>,
    global: &GlobalOpts,
    detail: &impl Fn(&T) -> String,
    plain: &impl Fn(&T) -> String,
) {
    if state.loading {
        return;
    }
    let table = matches!(global.output, OutputFormat::Table);

    if let Some(ref err) = state.error {
        let shown = state
            .last_updated
            .map_or_else(|| "nothing yet".into(), |ts| format!("data from {}", output::format_time(&ts)));
        eprintln!("[{name}] refresh failed ({err}); showing {shown}");
        return;
    }

    let Some(ref data) = state.data else { return };
    if table && !global.quiet {
        let when = state
            .last_updated
            .map(|ts| output::format_time(&ts))
            .unwrap_or_default();
        println!("── {name} · {when} · cycle {} ──", state.cycles);
    }
    let out = output::render_single(&global.output, data.as_ref(), detail, plain);
    output::print_output(&out, global.quiet);
}

fn join_ids(ids: impl Iterator<Item = String>) -> String {
    ids.collect::<Vec<_>>().join("\n")
}

fn node_table(nodes: &[Node]) -> String {
    let counts = NodeCounts::from_nodes(nodes);
    let rows: Vec<NodeRow> = nodes.iter().map(NodeRow::from).collect();
    let mut out = output::render_table(&rows);
    let _ = write!(
        out,
        "\n{} nodes: {} online, {} offline, {} maintenance",
        counts.total, counts.online, counts.offline, counts.maintenance
    );
    out
}

fn alert_table(alerts: &[Alert]) -> String {
    let counts = AlertCounts::from_alerts(alerts);
    let rows: Vec<AlertRow> = alerts.iter().map(AlertRow::from).collect();
    let mut out = output::render_table(&rows);
    let _ = write!(
        out,
        "\n{} unacknowledged, {} acknowledged, {} critical",
        counts.unacknowledged, counts.acknowledged, counts.critical
    );
    out
}

fn log_table(logs: &[EventLog]) -> String {
    let counts = LogCounts::from_logs(logs);
    let rows: Vec<LogRow> = logs.iter().map(LogRow::from).collect();
    let mut out = output::render_table(&rows);
    let _ = write!(
        out,
        "\n{} info, {} warn, {} error",
        counts.info, counts.warn, counts.error
    );
    out
}
