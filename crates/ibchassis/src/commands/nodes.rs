//! Node command handlers.

use tabled::Tabled;

use ibchassis_core::{Fabric, NodeReport};

use crate::cli::{GlobalOpts, NodesArgs, NodesCommand};
use crate::error::CliError;
use crate::output::{self, Painter};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "GUID")]
    guid: String,
    #[tabled(rename = "Type")]
    node_type: String,
    #[tabled(rename = "Vendor")]
    vendor: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Chassis")]
    chassis: String,
    #[tabled(rename = "Slot")]
    slot: String,
    #[tabled(rename = "Model")]
    model: String,
}

impl From<&NodeReport> for NodeRow {
    fn from(n: &NodeReport) -> Self {
        Self {
            guid: n.guid.to_string(),
            node_type: n.node_type.to_string(),
            vendor: format!("{:#06x}", n.vendor_id),
            device: format!("{:#06x}", n.device_id),
            chassis: output::or_dash(n.chassis),
            slot: output::or_dash(n.description.as_deref()),
            model: output::or_dash(n.model),
        }
    }
}

fn detail(n: &NodeReport, painter: Painter) -> String {
    let opt = |value: Option<String>| value.map_or_else(|| painter.none(), |v| painter.value(v));
    [
        format!("GUID:         {}", painter.value(n.guid)),
        format!("Type:         {}", n.node_type),
        format!("Vendor ID:    {:#06x}", n.vendor_id),
        format!("Device ID:    {:#06x}", n.device_id),
        format!("System image: {}", n.system_image_guid),
        format!("Chassis:      {}", opt(n.chassis.map(|c| c.to_string()))),
        format!("Model:        {}", opt(n.model.map(str::to_owned))),
        format!("Slot:         {}", opt(n.description.clone())),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(fabric: &Fabric, args: NodesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let format = global.output_format();
    let out = match args.command {
        NodesCommand::List { ungrouped } => {
            let reports: Vec<NodeReport> = fabric
                .discovery_order()
                .filter(|&id| !ungrouped || fabric.node(id).chassis().is_none())
                .map(|id| NodeReport::new(fabric, id))
                .collect();
            output::render_list(
                &format,
                &reports,
                |n| NodeRow::from(n),
                |n| n.guid.to_string(),
            )?
        }

        NodesCommand::Show { guid } => {
            let id = util::resolve_node(fabric, &guid)?;
            let report = NodeReport::new(fabric, id);
            let painter = Painter::new(&global.color_mode());
            output::render_single(
                &format,
                &report,
                |n| detail(n, painter),
                |n| n.guid.to_string(),
            )?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
