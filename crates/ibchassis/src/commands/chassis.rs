//! Chassis command handlers.

use serde::Serialize;
use tabled::Tabled;

use ibchassis_core::{ChassisReport, Fabric, GroupingStrategy, Guid, SlotEntry};

use crate::cli::{ChassisArgs, ChassisCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, Painter};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ChassisRow {
    #[tabled(rename = "#")]
    number: String,
    #[tabled(rename = "GUID")]
    guid: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "Nodes")]
    nodes: usize,
}

impl From<&ChassisReport> for ChassisRow {
    fn from(c: &ChassisReport) -> Self {
        Self {
            number: output::or_dash(c.number),
            guid: c.guid.to_string(),
            model: output::or_dash(c.model),
            strategy: strategy_label(c.strategy).into(),
            nodes: c.module_count(),
        }
    }
}

#[derive(Tabled)]
struct SlotRow {
    #[tabled(rename = "Index")]
    index: usize,
    #[tabled(rename = "Slot")]
    slot: String,
    #[tabled(rename = "Chip")]
    chip: u8,
    #[tabled(rename = "GUID")]
    guid: String,
}

impl From<&SlotEntry> for SlotRow {
    fn from(s: &SlotEntry) -> Self {
        Self {
            index: s.index,
            slot: format!("{} {}", s.kind, s.slot),
            chip: s.chip,
            guid: s.guid.to_string(),
        }
    }
}

/// `chassis guid` payload.
#[derive(Serialize)]
struct ChassisGuid {
    number: u32,
    guid: Guid,
}

fn strategy_label(strategy: GroupingStrategy) -> &'static str {
    match strategy {
        GroupingStrategy::Topology => "topology",
        GroupingStrategy::Identity => "identity",
    }
}

fn detail(c: &ChassisReport, painter: Painter) -> String {
    let title = format!("Chassis {}", output::or_dash(c.number));
    let mut lines = vec![
        painter.heading(&title),
        format!("GUID:     {}", painter.value(c.guid)),
        format!(
            "Model:    {}",
            c.model.map_or_else(|| painter.none(), |m| painter.value(m))
        ),
        format!("Strategy: {}", strategy_label(c.strategy)),
        format!("Nodes:    {}", c.module_count()),
    ];

    if !c.spines.is_empty() {
        lines.push(String::new());
        lines.push(painter.heading("Spines"));
        let rows: Vec<SlotRow> = c.spines.iter().map(SlotRow::from).collect();
        lines.push(output::render_table(&rows));
    }
    if !c.lines.is_empty() {
        lines.push(String::new());
        lines.push(painter.heading("Lines"));
        let rows: Vec<SlotRow> = c.lines.iter().map(SlotRow::from).collect();
        lines.push(output::render_table(&rows));
    }
    if !c.members.is_empty() {
        lines.push(String::new());
        lines.push(painter.heading("Members"));
        lines.extend(c.members.iter().map(|guid| format!("  {guid}")));
    }
    lines.join("\n")
}

fn find(fabric: &Fabric, number: u32) -> Result<ChassisReport, CliError> {
    fabric
        .find_chassis(number)
        .map(|id| ChassisReport::new(fabric, id))
        .ok_or_else(|| CliError::NotFound {
            resource_type: "chassis".into(),
            identifier: number.to_string(),
            list_command: "chassis list".into(),
        })
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(fabric: &Fabric, args: ChassisArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let format = global.output_format();
    let out = match args.command {
        ChassisCommand::List => {
            let reports = ChassisReport::all(fabric);
            output::render_list(
                &format,
                &reports,
                |c| ChassisRow::from(c),
                |c| output::or_dash(c.number),
            )?
        }

        ChassisCommand::Show { number } => {
            let report = find(fabric, number)?;
            let painter = Painter::new(&global.color_mode());
            output::render_single(
                &format,
                &report,
                |c| detail(c, painter),
                |c| c.guid.to_string(),
            )?
        }

        ChassisCommand::Guid { number } => {
            let payload = ChassisGuid {
                number,
                guid: fabric.chassis_guid(number).unwrap_or(Guid::ZERO),
            };
            output::render_single(
                &format,
                &payload,
                |p| p.guid.to_string(),
                |p| p.guid.to_string(),
            )?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
