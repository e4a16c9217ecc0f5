//! Node command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use floodwatch_core::view::{Criterion, NodeFilter, Predicate, TextQuery, paginate};
use floodwatch_core::{Monitor, Node, NodeDetail, NodeId, NodeStatus, SensorReading};

use crate::cli::{GlobalOpts, NodesArgs, NodesCommand, OutputFormat, StatusFilter};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct NodeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Water (cm)")]
    water_level: String,
    #[tabled(rename = "Signal (dBm)")]
    signal: String,
    #[tabled(rename = "Firmware")]
    firmware: String,
    #[tabled(rename = "Last ping")]
    last_ping: String,
}

impl From<&Node> for NodeRow {
    fn from(n: &Node) -> Self {
        Self {
            id: n.node_id.to_string(),
            name: n.name.clone(),
            status: n.status.to_string(),
            water_level: output::format_opt(n.latest.map(|r| format!("{:.1}", r.water_level_cm))),
            signal: output::format_opt(
                n.latest
                    .and_then(|r| r.signal_strength_dbm)
                    .map(|dbm| format!("{dbm:.0}")),
            ),
            firmware: output::format_opt(n.firmware_version.as_deref()),
            last_ping: output::format_time(&n.last_ping),
        }
    }
}

#[derive(Tabled)]
struct ReadingRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Water (cm)")]
    water_level: String,
    #[tabled(rename = "Signal (dBm)")]
    signal: String,
}

impl From<&SensorReading> for ReadingRow {
    fn from(r: &SensorReading) -> Self {
        Self {
            time: output::format_time(&r.timestamp),
            water_level: format!("{:.1}", r.water_level_cm),
            signal: format!("{:.0}", r.signal_strength_dbm),
        }
    }
}

// ── Filters ─────────────────────────────────────────────────────────

fn status_criterion(filter: StatusFilter) -> Criterion<NodeStatus> {
    match filter {
        StatusFilter::All => Criterion::Any,
        StatusFilter::Online => Criterion::Is(NodeStatus::Online),
        StatusFilter::Offline => Criterion::Is(NodeStatus::Offline),
        StatusFilter::Maintenance => Criterion::Is(NodeStatus::Maintenance),
    }
}

pub fn build_filter(status: StatusFilter, firmware: Option<&str>, search: Option<&str>) -> NodeFilter {
    NodeFilter {
        status: status_criterion(status),
        firmware: firmware.map_or(Criterion::Any, |fw| {
            let Ok(criterion) = fw.parse::<Criterion<String>>();
            criterion
        }),
        search: search.map(TextQuery::new).unwrap_or_default(),
    }
}

// ── Detail view ─────────────────────────────────────────────────────

fn detail_view(detail: &NodeDetail, color: bool) -> String {
    let node = &detail.node;
    let mut out = String::new();
    let _ = writeln!(out, "ID:          {}", node.node_id);
    let _ = writeln!(out, "Name:        {}", node.name);
    let _ = writeln!(out, "Status:      {}", output::paint_status(node.status, color));
    let _ = writeln!(out, "Location:    {}", output::format_opt(node.location_desc.as_deref()));
    let _ = writeln!(out, "Firmware:    {}", output::format_opt(node.firmware_version.as_deref()));
    let _ = writeln!(out, "Last ping:   {}", output::format_time(&node.last_ping));
    if let Some(created) = node.created_at {
        let _ = writeln!(out, "Installed:   {}", output::format_time(&created));
    }

    match detail.latest_reading() {
        Some(latest) => {
            let series = detail.water_level_series();
            let _ = writeln!(
                out,
                "Water level: {:.1} cm  {}",
                latest.water_level_cm,
                output::sparkline(&series)
            );
            let rows: Vec<ReadingRow> = detail.recent_readings.iter().map(ReadingRow::from).collect();
            let _ = write!(out, "\nRecent readings\n{}", output::render_table(&rows));
        }
        None => {
            let _ = write!(out, "{}", output::paint_dim("No readings reported yet", color));
        }
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(monitor: &Monitor, args: NodesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        NodesCommand::List {
            status,
            firmware,
            search,
            page,
            per_page,
            all,
        } => {
            let nodes = monitor.nodes().await?;
            let filter = build_filter(status, firmware.as_deref(), search.as_deref());
            let matching = filter.apply(&nodes);

            let (shown, footer) = if all {
                (matching, None)
            } else {
                let page = paginate(&matching, page, per_page);
                let footer = format!(
                    "Page {} of {} ({} matching of {} nodes)",
                    page.page,
                    page.total_pages.max(1),
                    page.total_items,
                    nodes.len()
                );
                (page.items, Some(footer))
            };

            let out = output::render_list(&global.output, &shown, |x| NodeRow::from(x), |n| {
                n.node_id.to_string()
            });
            output::print_output(&out, global.quiet);
            let table = matches!(global.output, OutputFormat::Table);
            if let Some(footer) = footer.filter(|_| table && !global.quiet) {
                eprintln!("{footer}");
            }
            Ok(())
        }

        NodesCommand::Show { node_id } => {
            let detail = monitor.node_detail(&NodeId::from(node_id)).await?;
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &detail,
                |d| detail_view(d, color),
                |d| d.node.node_id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
