//! Command dispatch: bridges CLI args -> core Dashboard -> output formatting.

pub mod config_cmd;
pub mod exadata;
pub mod licenses;
pub mod util;

use exaview_core::Dashboard;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    dashboard: &Dashboard,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Exadata(args) => exadata::handle(dashboard, args, global).await,
        Command::Licenses(args) => licenses::handle(dashboard, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
