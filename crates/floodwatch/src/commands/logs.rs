//! Event log command handlers.

use tabled::Tabled;

use floodwatch_core::view::{Criterion, LogFilter, Predicate, TextQuery};
use floodwatch_core::{EventLog, LogLevel, Monitor};

use crate::cli::{GlobalOpts, LevelFilter, LogsArgs, LogsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
pub struct LogRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl From<&EventLog> for LogRow {
    fn from(l: &EventLog) -> Self {
        Self {
            id: l.log_id.to_string(),
            time: output::format_time(&l.timestamp),
            level: l.log_level.to_string(),
            source: l.source.clone(),
            message: l.message.clone(),
        }
    }
}

pub fn build_filter(level: LevelFilter, search: Option<&str>) -> LogFilter {
    LogFilter {
        level: match level {
            LevelFilter::All => Criterion::Any,
            LevelFilter::Info => Criterion::Is(LogLevel::Info),
            LevelFilter::Warn => Criterion::Is(LogLevel::Warn),
            LevelFilter::Error => Criterion::Is(LogLevel::Error),
        },
        search: search.map(TextQuery::new).unwrap_or_default(),
    }
}

pub async fn handle(monitor: &Monitor, args: LogsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        LogsCommand::List { level, search } => {
            let logs = monitor.event_logs().await?;
            let shown = build_filter(level, search.as_deref()).apply(&logs);
            let color = output::should_color(&global.color);
            let out = output::render_list(&global.output, &shown, |x| LogRow::from(x), |l| {
                format!("{} {} {}", l.log_id, output::paint_level(l.log_level, color), l.message)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
