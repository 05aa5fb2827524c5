// ── Chassis identity resolution ──
//
// Vendors that are not grouped by the topology walk share a chassis when
// their (normalized) system-image guids are equal. Normalization differs
// per vendor family.

use crate::classify::{
    SLOT_BYTE_MASK, is_xsigo_ca, is_xsigo_guid, is_xsigo_leaf_one, is_xsigo_switch,
};
use crate::fabric::Fabric;
use crate::model::{Guid, NodeId, Vendor};

/// The port an Xsigo adapter exposes its leaf switch on.
const XSIGO_UPLINK_PORT: u8 = 1;

/// Identity key used to group `node` with its chassis siblings.
///
/// Reads the graph only; repeated calls on the same fabric return the
/// same value.
pub fn chassis_guid(fabric: &Fabric, node: NodeId) -> Guid {
    let n = fabric.node(node);
    let sysimg = n.system_image_guid();

    match n.vendor() {
        // Byte 4 carries the slot/location id.
        Vendor::Topspin | Vendor::SilverStorm => sysimg.masked(SLOT_BYTE_MASK),
        Vendor::Xsigo => xsigo_chassis_guid(fabric, node),
        _ if is_xsigo_guid(sysimg) => xsigo_chassis_guid(fabric, node),
        _ => sysimg,
    }
}

fn xsigo_chassis_guid(fabric: &Fabric, node: NodeId) -> Guid {
    let n = fabric.node(node);
    let sysimg = n.system_image_guid();

    // Byte 3 is the node type; for switches byte 4 is the port type.
    if !is_xsigo_ca(sysimg) {
        return if is_xsigo_switch(sysimg) {
            sysimg.masked(SLOT_BYTE_MASK)
        } else {
            sysimg
        };
    }

    let Some(uplink) = n.port(XSIGO_UPLINK_PORT) else {
        return Guid::ZERO;
    };
    let Some(peer) = fabric.remote_node(uplink) else {
        return sysimg;
    };

    let peer_sysimg = fabric.node(peer).system_image_guid();
    if is_xsigo_leaf_one(peer_sysimg) {
        peer_sysimg.masked(SLOT_BYTE_MASK)
    } else {
        sysimg
    }
}
