// ── Chassis assembly ──
//
// Grows one topology chassis outward from a seed fabric board. Slot
// insertion is first-writer-wins, so the propagation passes can be
// repeated freely until they stop adding anything.

use tracing::{debug, info};

use crate::classify::spine_model;
use crate::error::InvariantViolation;
use crate::fabric::Fabric;
use crate::model::{ChassisId, NodeId, SlotKind};
use crate::wiring::{self, LAST_SPINE_FACING_PORT, Position};

/// Propagation rounds; two are enough to pick up modules reachable only
/// through another module of the same chassis.
const PROPAGATION_ROUNDS: usize = 2;

/// Assemble `chassis` around the fabric board `spine`.
pub(crate) fn build_chassis(
    fabric: &mut Fabric,
    spine: NodeId,
    chassis: ChassisId,
) -> Result<(), InvariantViolation> {
    insert_spine(fabric, chassis, spine)?;

    let neighbours: Vec<NodeId> = fabric.links(spine).map(|(_, remote)| remote.node()).collect();
    for remote in neighbours {
        if fabric.node(remote).is_processed() {
            insert_line_router(fabric, chassis, remote)?;
        }
    }

    for _ in 0..PROPAGATION_ROUNDS {
        lines_catch_spines(fabric, chassis)?;
        spines_catch_lines(fabric, chassis)?;
    }

    interpolate_guid(fabric, chassis);

    let built = fabric.chassis(chassis);
    info!(
        number = built.number().unwrap_or_default(),
        guid = %built.guid(),
        spines = built.occupied_spines().count(),
        lines = built.occupied_lines().count(),
        "built chassis"
    );
    Ok(())
}

fn position(fabric: &Fabric, node: NodeId) -> Position {
    let slot = fabric.node(node).slot();
    Position {
        slot: slot.number,
        chip: slot.chip,
    }
}

/// Place a line board or router blade; anything else is skipped.
fn insert_line_router(
    fabric: &mut Fabric,
    chassis: ChassisId,
    node: NodeId,
) -> Result<(), InvariantViolation> {
    let n = fabric.node(node);
    if !n.slot().kind.uses_line_array() || n.chassis().is_some() {
        return Ok(());
    }
    let guid = n.guid();
    let index = wiring::line_index(guid, position(fabric, node))?;

    if fabric.chassis_mut(chassis).insert_line(index, node) {
        fabric.node_mut(node).chassis = Some(chassis);
        debug!(%guid, index, "inserted line module");
    }
    Ok(())
}

/// Place a fabric board. The node must classify as a fabric board, and an
/// unpositioned one lands on slot (0, 0), which is outside the spine array.
fn insert_spine(
    fabric: &mut Fabric,
    chassis: ChassisId,
    node: NodeId,
) -> Result<(), InvariantViolation> {
    let n = fabric.node(node);
    let guid = n.guid();
    let Some(model) = spine_model(n.record()) else {
        return Err(InvariantViolation::UnknownHardwareModel { guid });
    };
    if n.chassis().is_some() {
        return Ok(());
    }
    let index = wiring::spine_index(guid, model, position(fabric, node))?;

    if fabric.chassis_mut(chassis).insert_spine(index, node) {
        fabric.node_mut(node).chassis = Some(chassis);
        debug!(%guid, index, "inserted spine module");
    }
    Ok(())
}

// ── Propagation passes ──────────────────────────────────────────────

/// From every line board in the chassis, pull in the processed fabric
/// boards on its spine-facing ports. Router blades are not followed.
fn lines_catch_spines(fabric: &mut Fabric, chassis: ChassisId) -> Result<(), InvariantViolation> {
    let lines: Vec<NodeId> = fabric
        .chassis(chassis)
        .occupied_lines()
        .map(|(_, node)| node)
        .filter(|&node| fabric.node(node).slot().kind == SlotKind::Line)
        .collect();

    for line in lines {
        let spines: Vec<NodeId> = fabric
            .links(line)
            .filter(|(local, _)| local.number() <= LAST_SPINE_FACING_PORT)
            .map(|(_, remote)| remote.node())
            .filter(|&remote| fabric.node(remote).is_processed())
            .collect();
        for spine in spines {
            insert_spine(fabric, chassis, spine)?;
        }
    }
    Ok(())
}

/// From every fabric board in the chassis, pull in the processed line
/// boards and router blades it links to.
fn spines_catch_lines(fabric: &mut Fabric, chassis: ChassisId) -> Result<(), InvariantViolation> {
    let spines: Vec<NodeId> = fabric
        .chassis(chassis)
        .occupied_spines()
        .map(|(_, node)| node)
        .collect();

    for spine in spines {
        let lines: Vec<NodeId> = fabric
            .links(spine)
            .map(|(_, remote)| remote.node())
            .filter(|&remote| fabric.node(remote).is_processed())
            .collect();
        for line in lines {
            insert_line_router(fabric, chassis, line)?;
        }
    }
    Ok(())
}

/// The chassis guid is the first occupied spine slot's guid minus one,
/// matching the numbering used by the vendor's subnet manager.
fn interpolate_guid(fabric: &mut Fabric, chassis: ChassisId) {
    let first = fabric
        .chassis(chassis)
        .occupied_spines()
        .next()
        .map(|(_, node)| fabric.node(node).guid());
    if let Some(guid) = first {
        fabric.chassis_mut(chassis).guid = guid.wrapping_pred();
    }
}
