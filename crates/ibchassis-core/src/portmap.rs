// ── Front-panel port mapping ──

use crate::classify::line_model;
use crate::fabric::Fabric;
use crate::model::{Node, NodeId, SlotKind, Vendor};
use crate::wiring::{self, FIRST_CHIP_PORT, MAX_WIRED_PORT};

/// Front-panel label for port `number` of `node`, or 0 when the port is
/// not a chip port of a positioned line board.
pub fn external_port_number(node: &Node, number: u8) -> u8 {
    if node.vendor() != Vendor::Voltaire || !node.is_processed() {
        return 0;
    }
    let slot = node.slot();
    if slot.kind != SlotKind::Line || !(1..=2).contains(&slot.chip) {
        return 0;
    }
    if !(FIRST_CHIP_PORT..=MAX_WIRED_PORT).contains(&number) {
        return 0;
    }
    line_model(node.record()).map_or(0, |model| wiring::external_port(model, slot.chip, number))
}

/// Write the front-panel label of every port of `node`.
pub(crate) fn map_ports(fabric: &mut Fabric, node: NodeId) {
    let ports = fabric.node(node).ports().to_vec();
    for pid in ports {
        let number = fabric.port(pid).number();
        let external = external_port_number(fabric.node(node), number);
        fabric.port_mut(pid).external = external;
    }
}
