// ── Vendor / model classification ──
//
// Pure predicates over a node's management record and over system-image
// guid bit patterns. No side effects, no failure modes.

use crate::model::{ChassisModel, Guid, LineModel, NodeField, NodeRecord, Vendor, device_id};

// ── Device-id classification (Voltaire) ─────────────────────────────

fn device(record: &NodeRecord) -> Option<u32> {
    record.field(NodeField::DeviceId).as_u32()
}

/// IB-to-FC and IB-to-IP router blades.
pub fn is_router(record: &NodeRecord) -> bool {
    matches!(
        device(record),
        Some(device_id::IB_FC_ROUTER | device_id::IB_IP_ROUTER)
    )
}

/// Fabric-board generation of a spine node.
pub fn spine_model(record: &NodeRecord) -> Option<ChassisModel> {
    match device(record)? {
        device_id::SFB12 | device_id::SFB12_DDR => Some(ChassisModel::Isr9288),
        device_id::SFB4 | device_id::SFB4_DDR => Some(ChassisModel::Isr9096),
        device_id::SFB2012 => Some(ChassisModel::Isr2012),
        device_id::SFB2004 => Some(ChassisModel::Isr2004),
        _ => None,
    }
}

pub fn is_spine(record: &NodeRecord) -> bool {
    spine_model(record).is_some()
}

pub fn line_model(record: &NodeRecord) -> Option<LineModel> {
    match device(record)? {
        device_id::SLB24 | device_id::SLB24_DDR | device_id::SRB2004 => Some(LineModel::Slb24),
        device_id::SLB8 => Some(LineModel::Slb8),
        device_id::SLB2024 => Some(LineModel::Slb2024),
        _ => None,
    }
}

pub fn is_line(record: &NodeRecord) -> bool {
    line_model(record).is_some()
}

/// Any module that lives in a chassis switch (fabric or line board).
pub fn is_chassis_switch(record: &NodeRecord) -> bool {
    is_spine(record) || is_line(record)
}

// ── System-image guid families (Xsigo) ──────────────────────────────

const XSIGO_FAMILY_MASK: u64 = 0xffff_ff00_0000_0000;
const XSIGO_FAMILY: u64 = 0x0013_9700_0000_0000;
const XSIGO_TYPE_MASK: u64 = 0xffff_ffff_0000_0000;
const XSIGO_SWITCH: u64 = 0x0013_9701_0000_0000;
const XSIGO_HCA: u64 = 0x0013_9702_0000_0000;
const XSIGO_TCA: u64 = 0x0013_9703_0000_0000;
const XSIGO_LEAF_MASK: u64 = 0xffff_ffff_ff00_0000;
const XSIGO_LEAF_ONE: u64 = 0x0013_9701_0200_0000;

/// Clears the location (slot) byte of a system-image guid.
pub const SLOT_BYTE_MASK: u64 = 0xffff_ffff_00ff_ffff;

pub fn is_xsigo_guid(guid: Guid) -> bool {
    guid.matches(XSIGO_FAMILY_MASK, XSIGO_FAMILY)
}

pub fn is_xsigo_switch(guid: Guid) -> bool {
    guid.matches(XSIGO_TYPE_MASK, XSIGO_SWITCH)
}

pub fn is_xsigo_hca(guid: Guid) -> bool {
    guid.matches(XSIGO_TYPE_MASK, XSIGO_HCA)
}

pub fn is_xsigo_tca(guid: Guid) -> bool {
    guid.matches(XSIGO_TYPE_MASK, XSIGO_TCA)
}

pub fn is_xsigo_ca(guid: Guid) -> bool {
    is_xsigo_hca(guid) || is_xsigo_tca(guid)
}

/// Leaf switch in position one, the only leaf that exposes the chassis
/// guid to attached adapters.
pub fn is_xsigo_leaf_one(guid: Guid) -> bool {
    guid.matches(XSIGO_LEAF_MASK, XSIGO_LEAF_ONE)
}

/// Nodes of this vendor are placed by the topology walk.
pub fn is_topology_grouped(record: &NodeRecord) -> bool {
    record.vendor() == Vendor::Voltaire
}
