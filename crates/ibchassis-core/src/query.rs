// ── Reporting queries ──
//
// Read-only views over a grouped fabric, in the shape reporting tools
// consume them. All return `None` for "not applicable".

use std::fmt;

use serde::Serialize;

use crate::fabric::Fabric;
use crate::model::{ChassisModel, Guid, Node, NodeId, SlotKind, Vendor};

/// Chassis model of a topology-grouped node.
pub fn chassis_model(fabric: &Fabric, node: NodeId) -> Option<ChassisModel> {
    let n = fabric.node(node);
    if !in_topology_chassis(n) {
        return None;
    }
    n.slot().model
}

/// Human-readable chassis model label, e.g. `ISR9288`.
pub fn chassis_model_label(fabric: &Fabric, node: NodeId) -> Option<&'static str> {
    chassis_model(fabric, node).map(ChassisModel::label)
}

/// Where a module sits inside its chassis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotDescription {
    pub kind: SlotKind,
    pub number: u8,
    pub chip: u8,
}

impl fmt::Display for SlotDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} Chip {}", self.kind, self.number, self.chip)
    }
}

pub fn slot_description(fabric: &Fabric, node: NodeId) -> Option<SlotDescription> {
    let n = fabric.node(node);
    let slot = n.slot();
    if !in_topology_chassis(n) || !slot.is_resolved() {
        return None;
    }
    Some(SlotDescription {
        kind: slot.kind,
        number: slot.number,
        chip: slot.chip,
    })
}

fn in_topology_chassis(node: &Node) -> bool {
    node.vendor() == Vendor::Voltaire && node.chassis().is_some()
}

impl Fabric {
    /// Guid of the chassis numbered `number`, if there is one.
    pub fn chassis_guid(&self, number: u32) -> Option<Guid> {
        self.find_chassis(number).map(|id| self.chassis(id).guid())
    }
}
