//! Port map handler.

use tabled::Tabled;

use ibchassis_core::{Fabric, PortReport};

use crate::cli::{GlobalOpts, PortsArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "Port")]
    port: u8,
    #[tabled(rename = "External")]
    external: String,
    #[tabled(rename = "Remote GUID")]
    remote: String,
    #[tabled(rename = "Remote Port")]
    remote_port: String,
}

impl From<&PortReport> for PortRow {
    fn from(p: &PortReport) -> Self {
        Self {
            port: p.port,
            external: output::or_dash(p.external),
            remote: output::or_dash(p.remote.map(|r| r.guid)),
            remote_port: output::or_dash(p.remote.map(|r| r.port)),
        }
    }
}

/// Plain output: `port external` pairs, external `-` when unlabelled.
fn plain(p: &PortReport) -> String {
    format!("{} {}", p.port, output::or_dash(p.external))
}

pub fn handle(fabric: &Fabric, args: &PortsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let node = util::resolve_node(fabric, &args.guid)?;
    let ports = PortReport::for_node(fabric, node);
    let out = output::render_list(&global.output_format(), &ports, |p| PortRow::from(p), plain)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
