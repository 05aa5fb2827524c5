//! Grouping run statistics.

use serde::Serialize;

use ibchassis_core::{Fabric, GroupingSummary};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, Painter};

#[derive(Serialize)]
struct SummaryView {
    nodes: usize,
    max_hops: Option<usize>,
    #[serde(flatten)]
    grouping: GroupingSummary,
}

fn detail(s: &SummaryView, painter: Painter) -> String {
    [
        painter.heading("Fabric"),
        format!("Nodes:             {}", s.nodes),
        format!("Max hops:          {}", output::or_dash(s.max_hops)),
        String::new(),
        painter.heading("Grouping"),
        format!("Chassis:           {}", painter.value(s.grouping.chassis)),
        format!("  by topology:     {}", s.grouping.topology_chassis),
        format!("  by identity:     {}", s.grouping.identity_chassis),
        format!("Grouped nodes:     {}", s.grouping.grouped_nodes),
        format!("Ungrouped nodes:   {}", s.grouping.ungrouped_nodes),
    ]
    .join("\n")
}

pub fn handle(
    fabric: &Fabric,
    summary: GroupingSummary,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let view = SummaryView {
        nodes: fabric.node_count(),
        max_hops: fabric.max_hops(),
        grouping: summary,
    };
    let painter = Painter::new(&global.color_mode());
    let out = output::render_single(
        &global.output_format(),
        &view,
        |s| detail(s, painter),
        |s| s.grouping.chassis.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
