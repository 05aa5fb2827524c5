// ── Static wiring tables ──
//
// How fabric-board ports connect to line-board slots for each chassis
// generation, and how line-board chip ports map onto front-panel labels.
// Every table is indexed by a 1-based port number; index 0 and any cell
// holding 0 mean "not wired".

use crate::error::{InvariantViolation, SlotArray};
use crate::model::{ChassisModel, Guid, LINES_MAX, LineModel, SPINES_MAX};

/// Highest port number covered by the tables.
pub const MAX_WIRED_PORT: u8 = 24;

/// Line-board ports `1..=12` face the fabric boards; `13..=24` are chip
/// ports wired to the front panel.
pub const LAST_SPINE_FACING_PORT: u8 = 12;
pub const FIRST_CHIP_PORT: u8 = 13;

type PortTable = [u8; MAX_WIRED_PORT as usize + 1];

//                                  0  1  2  3  4  5  6  7  8  9 10 11 12 13 14 15 16 17 18 19 20 21 22 23 24
const LINE_SLOT_SFB4: PortTable = [0, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 4];
const LINE_CHIP_SFB4: PortTable = [0, 1, 1, 1, 2, 2, 2, 1, 1, 1, 2, 2, 2, 1, 1, 1, 2, 2, 2, 1, 1, 1, 2, 2, 2];
const LINE_SLOT_SFB12: PortTable = [0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12];
const LINE_CHIP_SFB12: PortTable = [0, 1, 2, 1, 2, 1, 2, 1, 2, 1, 2, 1, 2, 1, 2, 1, 2, 1, 2, 1, 2, 1, 2, 1, 2];

const ROUTER_CHIP_SFB4: PortTable = [0, 3, 2, 1, 3, 2, 1, 3, 2, 1, 3, 2, 1, 3, 2, 1, 3, 2, 1, 3, 2, 1, 3, 2, 1];

const SPINE_SLOT_FROM_LINE: PortTable = [0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
const SPINE12_CHIP_FROM_LINE: PortTable = [0, 1, 2, 3, 1, 2, 3, 1, 2, 3, 1, 2, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
const SPINE4_CHIP_FROM_LINE: PortTable = [0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];

/// Router blades on 12-chip fabric boards are not position-addressable.
#[derive(Debug, Clone, Copy)]
enum RouterChip {
    Table(&'static PortTable),
    /// Best guess from the fabric board's node guid ordering.
    SpineGuidHeuristic,
}

struct Wiring {
    line_slot: &'static PortTable,
    line_chip: &'static PortTable,
    router_chip: RouterChip,
    spine_slot: &'static PortTable,
    spine_chip: &'static PortTable,
}

static SFB4_WIRING: Wiring = Wiring {
    line_slot: &LINE_SLOT_SFB4,
    line_chip: &LINE_CHIP_SFB4,
    router_chip: RouterChip::Table(&ROUTER_CHIP_SFB4),
    spine_slot: &SPINE_SLOT_FROM_LINE,
    spine_chip: &SPINE4_CHIP_FROM_LINE,
};

static SFB12_WIRING: Wiring = Wiring {
    line_slot: &LINE_SLOT_SFB12,
    line_chip: &LINE_CHIP_SFB12,
    router_chip: RouterChip::SpineGuidHeuristic,
    spine_slot: &SPINE_SLOT_FROM_LINE,
    spine_chip: &SPINE12_CHIP_FROM_LINE,
};

fn wiring(model: ChassisModel) -> &'static Wiring {
    match model {
        ChassisModel::Isr9096 | ChassisModel::Isr2004 => &SFB4_WIRING,
        ChassisModel::Isr9288 | ChassisModel::Isr2012 => &SFB12_WIRING,
    }
}

// ── Positions ───────────────────────────────────────────────────────

/// Slot and chip of a module, as read from the wiring tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub slot: u8,
    pub chip: u8,
}

fn cell(table: &PortTable, port: u8) -> Option<u8> {
    table.get(usize::from(port)).copied()
}

fn position(slot: &PortTable, chip: &PortTable, port: u8) -> Option<Position> {
    Some(Position {
        slot: cell(slot, port)?,
        chip: cell(chip, port)?,
    })
}

/// Position of a fabric board, seen from the line-board port it links to.
///
/// `None` when `line_port` is beyond the tables.
pub fn spine_position(model: ChassisModel, line_port: u8) -> Option<Position> {
    let w = wiring(model);
    position(w.spine_slot, w.spine_chip, line_port)
}

/// Position of a line board, seen from the fabric-board port it links to.
pub fn line_position(model: ChassisModel, spine_port: u8) -> Option<Position> {
    let w = wiring(model);
    position(w.line_slot, w.line_chip, spine_port)
}

/// Position of a router blade, seen from the fabric-board port it links to.
///
/// On 12-chip fabric boards the chip is a heuristic: `spine_guid % 4`
/// of 3, 1, anything else maps to chip 1, 3, 2.
pub fn router_position(model: ChassisModel, spine_port: u8, spine_guid: Guid) -> Option<Position> {
    let w = wiring(model);
    let slot = cell(w.line_slot, spine_port)?;
    let chip = match w.router_chip {
        RouterChip::Table(table) => cell(table, spine_port)?,
        RouterChip::SpineGuidHeuristic => match spine_guid.get() % 4 {
            3 => 1,
            1 => 3,
            _ => 2,
        },
    };
    Some(Position { slot, chip })
}

// ── Flat slot indices ───────────────────────────────────────────────

fn checked_index(guid: Guid, array: SlotArray, index: i32, max: usize) -> Result<usize, InvariantViolation> {
    usize::try_from(index)
        .ok()
        .filter(|i| (1..=max).contains(i))
        .ok_or(InvariantViolation::SlotIndexOutOfRange {
            guid,
            array,
            index,
            max,
        })
}

/// Flat index into the line/router slot array: `3 * (slot - 1) + chip`.
pub fn line_index(guid: Guid, pos: Position) -> Result<usize, InvariantViolation> {
    let index = 3 * (i32::from(pos.slot) - 1) + i32::from(pos.chip);
    checked_index(guid, SlotArray::Line, index, LINES_MAX)
}

/// Flat index into the spine slot array.
pub fn spine_index(guid: Guid, model: ChassisModel, pos: Position) -> Result<usize, InvariantViolation> {
    let index = if model.has_multichip_spines() {
        3 * (i32::from(pos.slot) - 1) + i32::from(pos.chip)
    } else {
        i32::from(pos.slot)
    };
    checked_index(guid, SlotArray::Spine, index, SPINES_MAX)
}

// ── Front-panel port maps ───────────────────────────────────────────

type ChipPortMap = [PortTable; 2];

const EXT_SLB24: ChipPortMap = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 6, 5, 4, 18, 17, 16, 1, 2, 3, 13, 14, 15],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 12, 11, 10, 24, 23, 22, 7, 8, 9, 19, 20, 21],
];
const EXT_SLB8: ChipPortMap = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 2, 2, 6, 6, 6, 1, 1, 1, 5, 5, 5],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 4, 4, 8, 8, 8, 3, 3, 3, 7, 7, 7],
];
const EXT_SLB2024: ChipPortMap = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
];

/// Front-panel label of chip port `port` on chip `chip` (1 or 2) of a line
/// board; 0 when the cell is not wired to the front panel.
pub fn external_port(model: LineModel, chip: u8, port: u8) -> u8 {
    let map = match model {
        LineModel::Slb24 => &EXT_SLB24,
        LineModel::Slb8 => &EXT_SLB8,
        LineModel::Slb2024 => &EXT_SLB2024,
    };
    usize::from(chip)
        .checked_sub(1)
        .and_then(|c| map.get(c))
        .and_then(|row| cell(row, port))
        .unwrap_or(0)
}
