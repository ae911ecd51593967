//! Command handlers, one module per top-level command.

pub mod config_cmd;
pub mod history;
pub mod util;
pub mod values;
pub mod variables;

use upway_core::UpwayClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a command that needs a data service client.
pub async fn dispatch(
    cmd: Command,
    client: &mut UpwayClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Values(args) => values::handle(args, client, global).await,
        Command::History(args) => history::handle(args, client, global).await,
        // Handled before a client is built.
        Command::Variables | Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
