// ── Intra-chassis topology walk ──
//
// Positions Voltaire chassis modules relative to their neighbours. A walk
// starts at one node and floods through fabric boards, line boards and
// router blades of the same family; every node it reaches is marked
// processed exactly once, so the graph's cycles terminate the flood.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::classify::{is_line, is_router, spine_model};
use crate::error::InvariantViolation;
use crate::fabric::Fabric;
use crate::model::{
    ChassisModel, Guid, NodeId, NodeType, SlotAssignment, SlotKind, Vendor,
};
use crate::portmap::map_ports;
use crate::wiring::{self, LAST_SPINE_FACING_PORT, Position};

/// One discovered link as seen from the node being visited.
#[derive(Debug, Clone, Copy)]
struct Link {
    local_port: u8,
    remote: NodeId,
    remote_port: u8,
}

fn links(fabric: &Fabric, node: NodeId) -> Vec<Link> {
    fabric
        .links(node)
        .map(|(local, remote)| Link {
            local_port: local.number(),
            remote: remote.node(),
            remote_port: remote.number(),
        })
        .collect()
}

/// Flood from `start`, positioning every reachable chassis module.
///
/// Already-processed nodes and nodes outside the Voltaire family are left
/// untouched.
pub(crate) fn walk(fabric: &mut Fabric, start: NodeId) -> Result<(), InvariantViolation> {
    let mut queue = VecDeque::from([start]);

    while let Some(id) = queue.pop_front() {
        let node = fabric.node(id);
        if node.is_processed() || node.vendor() != Vendor::Voltaire {
            continue;
        }
        let record = *node.record();
        fabric.node_mut(id).processed = true;

        if is_router(&record) {
            visit_router(fabric, id, &mut queue)?;
        } else if let Some(model) = spine_model(&record) {
            visit_spine(fabric, id, model, &mut queue)?;
        } else if is_line(&record) {
            visit_line(fabric, id, &mut queue)?;
        }

        map_ports(fabric, id);
    }

    Ok(())
}

fn assign(fabric: &mut Fabric, id: NodeId, kind: SlotKind, model: ChassisModel, pos: Position) {
    let node = fabric.node_mut(id);
    node.slot = SlotAssignment {
        kind,
        model: Some(model),
        number: pos.slot,
        chip: pos.chip,
    };
    debug!(
        guid = %node.guid,
        kind = %kind,
        model = %model,
        slot = pos.slot,
        chip = pos.chip,
        "positioned module"
    );
}

fn wiring_error(guid: Guid, port: u8) -> InvariantViolation {
    InvariantViolation::WiringPortOutOfRange { guid, port }
}

// ── Router blades ───────────────────────────────────────────────────

/// A router blade takes its position from the fabric boards it is linked
/// to; each link overwrites the previous one, so the last board wins.
fn visit_router(
    fabric: &mut Fabric,
    id: NodeId,
    queue: &mut VecDeque<NodeId>,
) -> Result<(), InvariantViolation> {
    let mut positioned = false;

    for link in links(fabric, id) {
        let spine = fabric.node(link.remote);
        let Some(model) = spine_model(spine.record()) else {
            continue;
        };
        let spine_guid = spine.guid();

        let pos = wiring::router_position(model, link.remote_port, spine_guid)
            .ok_or_else(|| wiring_error(spine_guid, link.remote_port))?;
        assign(fabric, id, SlotKind::RouterBlade, model, pos);
        queue.push_back(link.remote);
        positioned = true;
    }

    if !positioned {
        debug!(guid = %fabric.node(id).guid(), "router blade has no fabric-board neighbour");
    }
    Ok(())
}

// ── Fabric boards ───────────────────────────────────────────────────

/// Tags router blades hanging off the board, positions the board itself
/// from the first line board it reaches, and queues its line boards.
fn visit_spine(
    fabric: &mut Fabric,
    id: NodeId,
    model: ChassisModel,
    queue: &mut VecDeque<NodeId>,
) -> Result<(), InvariantViolation> {
    let guid = fabric.node(id).guid();
    let mut positioned = false;

    for link in links(fabric, id) {
        let remote = fabric.node(link.remote);
        if remote.vendor() != Vendor::Voltaire {
            continue;
        }
        let (remote_type, remote_guid, remote_done) =
            (remote.node_type(), remote.guid(), remote.is_processed());
        let remote_is_line = is_line(remote.record());

        if remote_type != NodeType::Switch {
            if !remote_done {
                let pos = wiring::router_position(model, link.local_port, guid)
                    .ok_or_else(|| wiring_error(guid, link.local_port))?;
                fabric.node_mut(link.remote).processed = true;
                assign(fabric, link.remote, SlotKind::RouterBlade, model, pos);
            }
            continue;
        }
        if !remote_is_line {
            continue;
        }

        if !positioned {
            let pos = wiring::spine_position(model, link.remote_port)
                .ok_or_else(|| wiring_error(remote_guid, link.remote_port))?;
            assign(fabric, id, SlotKind::Spine, model, pos);
            positioned = true;
        }
        if !remote_done {
            queue.push_back(link.remote);
        }
    }

    if !positioned {
        fabric.node_mut(id).slot.model = Some(model);
        warn!(%guid, %model, "fabric board has no line-board neighbour");
    }
    Ok(())
}

// ── Line boards ─────────────────────────────────────────────────────

/// A line board takes its position from its first linked spine-facing
/// port; that port must lead to a known fabric board.
fn visit_line(
    fabric: &mut Fabric,
    id: NodeId,
    queue: &mut VecDeque<NodeId>,
) -> Result<(), InvariantViolation> {
    let mut positioned = false;

    for link in links(fabric, id) {
        if link.local_port > LAST_SPINE_FACING_PORT {
            continue;
        }
        let spine = fabric.node(link.remote);
        let (spine_guid, spine_done) = (spine.guid(), spine.is_processed());
        let model = spine_model(spine.record());

        if !positioned {
            let Some(model) = model else {
                return Err(InvariantViolation::UnknownHardwareModel { guid: spine_guid });
            };
            let pos = wiring::line_position(model, link.remote_port)
                .ok_or_else(|| wiring_error(spine_guid, link.remote_port))?;
            assign(fabric, id, SlotKind::Line, model, pos);
            positioned = true;
        }
        if model.is_some() && !spine_done {
            queue.push_back(link.remote);
        }
    }

    if !positioned {
        warn!(guid = %fabric.node(id).guid(), "line board has no fabric-board link, left unpositioned");
    }
    Ok(())
}
