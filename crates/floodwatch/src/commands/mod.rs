//! Command dispatch: bridges CLI args -> core reads and surfaces -> output.

pub mod alerts;
pub mod config_cmd;
pub mod logs;
pub mod nodes;
pub mod status;
pub mod watch;

use floodwatch_core::Monitor;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, monitor: &Monitor, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle_status(monitor, global).await,
        Command::Health => status::handle_health(monitor, global).await,
        Command::Nodes(args) => nodes::handle(monitor, args, global).await,
        Command::Alerts(args) => alerts::handle(monitor, args, global).await,
        Command::Logs(args) => logs::handle(monitor, args, global).await,
        Command::Watch(args) => watch::handle(monitor, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
