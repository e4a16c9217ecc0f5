//! Alert command handlers.

use std::fmt::Write as _;

use tabled::Tabled;
use tracing::debug;

use floodwatch_core::view::{AlertFilter, Criterion, Predicate};
use floodwatch_core::{AckOutcome, AckState, Alert, AlertId, AlertSeverity, Monitor};

use crate::cli::{AckFilter, AlertsArgs, AlertsCommand, GlobalOpts, SeverityFilter};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct AlertRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "Acknowledged")]
    acknowledged: String,
}

impl From<&Alert> for AlertRow {
    fn from(a: &Alert) -> Self {
        Self {
            id: a.alert_id.to_string(),
            time: output::format_time(&a.timestamp),
            severity: a.severity.to_string(),
            node: a.node_label().to_owned(),
            acknowledged: if a.is_acknowledged { "yes" } else { "no" }.into(),
        }
    }
}

// ── Filters ─────────────────────────────────────────────────────────

pub fn build_filter(severity: SeverityFilter, state: AckFilter) -> AlertFilter {
    AlertFilter {
        severity: match severity {
            SeverityFilter::All => Criterion::Any,
            SeverityFilter::Info => Criterion::Is(AlertSeverity::Info),
            SeverityFilter::Warning => Criterion::Is(AlertSeverity::Warning),
            SeverityFilter::Critical => Criterion::Is(AlertSeverity::Critical),
        },
        state: match state {
            AckFilter::All => Criterion::Any,
            AckFilter::Acknowledged => Criterion::Is(AckState::Acknowledged),
            AckFilter::Unacknowledged => Criterion::Is(AckState::Unacknowledged),
        },
    }
}

// ── Detail view ─────────────────────────────────────────────────────

fn detail_view(alert: &Alert, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:           {}", alert.alert_id);
    let _ = writeln!(out, "Severity:     {}", output::paint_severity(alert.severity, color));
    let _ = writeln!(out, "Node:         {} ({})", alert.node_label(), alert.node_id);
    let _ = writeln!(out, "Raised:       {}", output::format_time(&alert.timestamp));
    if let Some(ref url) = alert.verification_image_url {
        let _ = writeln!(out, "Image:        {url}");
    }
    let _ = write!(out, "Acknowledged: {}", if alert.is_acknowledged { "yes" } else { "no" });
    out
}

// ── Acknowledge ─────────────────────────────────────────────────────

/// Acknowledge through the alerts surface, then wait for the forced
/// re-read and return the alert as the backend now reports it.
async fn acknowledge(monitor: &Monitor, alert_id: AlertId) -> Result<Alert, CliError> {
    let surface = monitor.watch_alerts();
    let mut states = surface.poller().subscribe();
    let before = states.current().cycles;

    match surface.acknowledge(alert_id).await? {
        AckOutcome::Sent => debug!(%alert_id, "acknowledgment sent"),
        AckOutcome::AlreadyPending => debug!(%alert_id, "acknowledgment already pending"),
    }

    // A cycle already in flight when the command landed may predate it;
    // the refresh it triggered is then the one after that.
    let result = loop {
        let Some(state) = states.changed().await else {
            break Err(CliError::Validation {
                field: "alerts".into(),
                reason: "alert surface stopped before re-reading".into(),
            });
        };
        if state.cycles <= before {
            continue;
        }
        if let Some(err) = state.error {
            if state.cycles > before + 1 {
                break Err(err.into());
            }
            continue;
        }
        let found = state
            .data
            .as_deref()
            .and_then(|alerts| alerts.iter().find(|a| a.alert_id == alert_id).cloned());
        match found {
            Some(alert) if alert.is_acknowledged || state.cycles > before + 1 => break Ok(alert),
            Some(_) => {}
            None => {
                break Err(CliError::NotFound {
                    resource_type: "alert".into(),
                    identifier: alert_id.to_string(),
                    list_command: "alerts list".into(),
                });
            }
        }
    };

    surface.stop();
    result
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(monitor: &Monitor, args: AlertsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        AlertsCommand::List { severity, state } => {
            let alerts = monitor.alerts().await?;
            let shown = build_filter(severity, state).apply(&alerts);
            let out = output::render_list(&global.output, &shown, |x| AlertRow::from(x), |a| {
                a.alert_id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AlertsCommand::Ack { alert_id } => {
            let alert = acknowledge(monitor, AlertId::new(alert_id)).await?;
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &alert,
                |a| detail_view(a, color),
                |a| a.ack_state().to_string(),
            );
            output::print_output(&out, global.quiet);
            if !alert.is_acknowledged && !global.quiet {
                eprintln!("Backend has not reported alert {alert_id} as acknowledged yet");
            }
            Ok(())
        }
    }
}
