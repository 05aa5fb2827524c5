//! Command dispatch: bridges CLI args -> grouped fabric -> output formatting.

pub mod chassis;
pub mod config_cmd;
pub mod nodes;
pub mod ports;
pub mod summary;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

use util::GroupedFabric;

/// Dispatch a fabric-bound command to the appropriate handler.
pub fn dispatch(cmd: Command, grouped: &GroupedFabric, global: &GlobalOpts) -> Result<(), CliError> {
    let fabric = &grouped.fabric;
    match cmd {
        Command::Chassis(args) => chassis::handle(fabric, args, global),
        Command::Nodes(args) => nodes::handle(fabric, args, global),
        Command::Ports(args) => ports::handle(fabric, &args, global),
        Command::Summary => summary::handle(fabric, grouped.summary, global),
        // Config and Completions never reach a fabric
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
