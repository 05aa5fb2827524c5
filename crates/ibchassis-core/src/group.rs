// ── Grouping driver ──
//
// Three phases over the discovered fabric:
//   1. walk Voltaire nodes in hop order and position every chassis module,
//   2. seed one topology chassis per unclaimed positioned fabric board,
//   3. group every other vendor by resolved chassis identity.
// Each run starts from a clean slate, so grouping the same fabric twice
// produces identical results.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::builder::build_chassis;
use crate::classify::{is_spine, is_topology_grouped};
use crate::error::InvariantViolation;
use crate::fabric::Fabric;
use crate::identity;
use crate::model::{Chassis, ChassisId, GroupingStrategy, Guid, NodeId};
use crate::report::GroupingSummary;
use crate::walker::walk;

/// Smallest identity group that forms a chassis.
pub const MIN_IDENTITY_MEMBERS: u32 = 2;

/// Tunables for a grouping run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingOptions {
    /// Run the identity phase for vendors that are not topology-walked.
    pub identity_grouping: bool,
    /// Members an identity needs before it is promoted to a chassis.
    /// Clamped to at least [`MIN_IDENTITY_MEMBERS`].
    pub min_identity_members: u32,
}

impl Default for GroupingOptions {
    fn default() -> Self {
        Self {
            identity_grouping: true,
            min_identity_members: MIN_IDENTITY_MEMBERS,
        }
    }
}

impl GroupingOptions {
    pub fn promotion_threshold(&self) -> u32 {
        self.min_identity_members.max(MIN_IDENTITY_MEMBERS)
    }
}

/// Group the fabric's nodes into chassis.
///
/// Any chassis from a previous run is discarded first. On an invariant
/// violation the run is abandoned and the fabric is left ungrouped.
pub fn group_nodes(
    fabric: &mut Fabric,
    options: &GroupingOptions,
) -> Result<GroupingSummary, InvariantViolation> {
    fabric.reset_grouping();

    if let Err(err) = run(fabric, options) {
        error!(guid = %err.guid(), error = %err, "grouping aborted");
        fabric.reset_grouping();
        return Err(err);
    }

    let summary = GroupingSummary::collect(fabric);
    info!(
        chassis = summary.chassis,
        topology = summary.topology_chassis,
        identity = summary.identity_chassis,
        grouped = summary.grouped_nodes,
        ungrouped = summary.ungrouped_nodes,
        "grouping complete"
    );
    Ok(summary)
}

fn run(fabric: &mut Fabric, options: &GroupingOptions) -> Result<(), InvariantViolation> {
    let order: Vec<NodeId> = fabric.hop_order().collect();
    let mut numbering = Numbering::default();

    position_modules(fabric, &order)?;
    assemble_chassis(fabric, &order, &mut numbering)?;

    if options.identity_grouping {
        group_by_identity(fabric, &order, &mut numbering, options.promotion_threshold());
    } else {
        debug!("identity grouping disabled");
    }
    Ok(())
}

/// Hands out 1-based chassis numbers in discovery order.
#[derive(Debug, Default)]
struct Numbering(u32);

impl Numbering {
    fn next(&mut self) -> u32 {
        self.0 += 1;
        self.0
    }
}

// ── Phase 1 ─────────────────────────────────────────────────────────

fn position_modules(fabric: &mut Fabric, order: &[NodeId]) -> Result<(), InvariantViolation> {
    for &id in order {
        let node = fabric.node(id);
        if is_topology_grouped(node.record()) && !node.is_processed() {
            walk(fabric, id)?;
        }
    }
    Ok(())
}

// ── Phase 2 ─────────────────────────────────────────────────────────

fn assemble_chassis(
    fabric: &mut Fabric,
    order: &[NodeId],
    numbering: &mut Numbering,
) -> Result<(), InvariantViolation> {
    for &id in order {
        let node = fabric.node(id);
        if !is_topology_grouped(node.record())
            || !node.is_processed()
            || node.chassis().is_some()
            || !is_spine(node.record())
        {
            continue;
        }

        let mut chassis = Chassis::new(GroupingStrategy::Topology);
        chassis.number = Some(numbering.next());
        let cid = fabric.push_chassis(chassis);
        build_chassis(fabric, id, cid)?;
    }
    Ok(())
}

// ── Phase 3 ─────────────────────────────────────────────────────────

fn identity_key(fabric: &Fabric, id: NodeId) -> Option<Guid> {
    let node = fabric.node(id);
    if is_topology_grouped(node.record()) || node.system_image_guid().is_zero() {
        return None;
    }
    Some(identity::chassis_guid(fabric, id))
}

fn find_by_guid(fabric: &Fabric, guid: Guid) -> Option<ChassisId> {
    fabric
        .chassis_list()
        .find(|(_, chassis)| chassis.guid() == guid)
        .map(|(id, _)| id)
}

fn group_by_identity(
    fabric: &mut Fabric,
    order: &[NodeId],
    numbering: &mut Numbering,
    threshold: u32,
) {
    // Count pass: hop buckets only.
    for &id in order {
        let Some(key) = identity_key(fabric, id) else {
            continue;
        };
        if let Some(cid) = find_by_guid(fabric, key) {
            fabric.chassis_mut(cid).node_count += 1;
        } else {
            let mut chassis = Chassis::new(GroupingStrategy::Identity);
            chassis.guid = key;
            chassis.node_count = 1;
            fabric.push_chassis(chassis);
        }
    }

    // Promotion pass: endpoints join identities counted by switches.
    let order: Vec<NodeId> = fabric.discovery_order().collect();
    for id in order {
        let Some(key) = identity_key(fabric, id) else {
            continue;
        };
        let Some(cid) = find_by_guid(fabric, key) else {
            continue;
        };
        let chassis = fabric.chassis_mut(cid);
        if chassis.node_count < threshold {
            continue;
        }
        if chassis.number.is_none() {
            chassis.number = Some(numbering.next());
        }

        if !fabric.node(id).is_processed() {
            let node = fabric.node_mut(id);
            node.processed = true;
            node.chassis = Some(cid);
            fabric.chassis_mut(cid).members.push(id);
            debug!(guid = %fabric.node(id).guid(), chassis = %key, "joined identity chassis");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{NodeRecord, NodeType, Placement, device_id, vendor_id};

    fn add(fabric: &mut Fabric, guid: u64, vendor: u32, device: u32, sysimg: u64, placement: Placement) -> NodeId {
        fabric
            .add_node(
                Guid::new(guid),
                NodeRecord {
                    vendor_id: vendor,
                    device_id: device,
                    node_type: if placement == Placement::Endpoint {
                        NodeType::Ca
                    } else {
                        NodeType::Switch
                    },
                    system_image_guid: Guid::new(sysimg),
                },
                4,
                placement,
            )
            .unwrap()
    }

    #[test]
    fn threshold_is_clamped() {
        let options = GroupingOptions {
            identity_grouping: true,
            min_identity_members: 0,
        };
        assert_eq!(options.promotion_threshold(), 2);
        let options = GroupingOptions {
            min_identity_members: 3,
            ..GroupingOptions::default()
        };
        assert_eq!(options.promotion_threshold(), 3);
    }

    #[test]
    fn endpoints_join_but_do_not_count() {
        let mut fabric = Fabric::new();
        let sw = add(&mut fabric, 1, 0x02c9, 0xb924, 0xaa, Placement::Hops(0));
        let ca = add(&mut fabric, 2, 0x02c9, 0x1003, 0xaa, Placement::Endpoint);

        let summary = group_nodes(&mut fabric, &GroupingOptions::default()).unwrap();
        assert_eq!(summary.chassis, 0);
        assert_eq!(fabric.node(sw).chassis(), None);
        assert_eq!(fabric.node(ca).chassis(), None);

        let sw2 = add(&mut fabric, 3, 0x02c9, 0xb924, 0xaa, Placement::Hops(1));
        group_nodes(&mut fabric, &GroupingOptions::default()).unwrap();
        let (cid, chassis) = fabric.numbered_chassis().next().unwrap();
        assert_eq!(chassis.node_count(), 2);
        assert_eq!(chassis.members(), [sw, sw2, ca]);
        assert_eq!(fabric.node(ca).chassis(), Some(cid));
    }

    #[test]
    fn identity_phase_can_be_disabled() {
        let mut fabric = Fabric::new();
        add(&mut fabric, 1, 0x02c9, 0xb924, 0xaa, Placement::Hops(0));
        add(&mut fabric, 2, 0x02c9, 0xb924, 0xaa, Placement::Hops(0));

        let options = GroupingOptions {
            identity_grouping: false,
            ..GroupingOptions::default()
        };
        let summary = group_nodes(&mut fabric, &options).unwrap();
        assert_eq!(summary.chassis, 0);
        assert_eq!(fabric.chassis_list().count(), 0);
    }

    #[test]
    fn identity_numbers_follow_topology_numbers() {
        let mut fabric = Fabric::new();
        let spine = add(&mut fabric, 0x11, vendor_id::VOLTAIRE, device_id::SFB2004, 0, Placement::Hops(0));
        let line = add(&mut fabric, 0x21, vendor_id::VOLTAIRE, device_id::SLB2024, 0, Placement::Hops(1));
        fabric.connect(spine, 1, line, 1).unwrap();
        add(&mut fabric, 0x31, vendor_id::TOPSPIN, 0x1, 0x0005_ad00_0100_0001, Placement::Hops(1));
        add(&mut fabric, 0x32, vendor_id::TOPSPIN, 0x1, 0x0005_ad00_0200_0001, Placement::Hops(2));

        let summary = group_nodes(&mut fabric, &GroupingOptions::default()).unwrap();
        assert_eq!(summary.topology_chassis, 1);
        assert_eq!(summary.identity_chassis, 1);
        assert_eq!(fabric.chassis_guid(2), Some(Guid::new(0x0005_ad00_0000_0001)));
    }

    #[test]
    fn fabric_board_without_line_boards_aborts_the_run() {
        let mut fabric = Fabric::new();
        let spine = add(&mut fabric, 0x11, vendor_id::VOLTAIRE, device_id::SFB4, 0, Placement::Hops(0));
        let router = fabric
            .add_node(
                Guid::new(0x51),
                NodeRecord {
                    vendor_id: vendor_id::VOLTAIRE,
                    device_id: device_id::IB_IP_ROUTER,
                    node_type: NodeType::Router,
                    system_image_guid: Guid::ZERO,
                },
                2,
                Placement::Hops(1),
            )
            .unwrap();
        fabric.connect(spine, 1, router, 1).unwrap();

        let err = group_nodes(&mut fabric, &GroupingOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            InvariantViolation::SlotIndexOutOfRange { index: 0, .. }
        ));
        assert_eq!(err.guid(), Guid::new(0x11));
        assert_eq!(fabric.chassis_list().count(), 0);
        assert_eq!(fabric.node(router).chassis(), None);
    }

    #[test]
    fn failed_run_leaves_fabric_ungrouped() {
        let mut fabric = Fabric::new();
        let spine = add(&mut fabric, 0x11, vendor_id::VOLTAIRE, device_id::SFB4, 0, Placement::Hops(0));
        let line = add(&mut fabric, 0x21, vendor_id::VOLTAIRE, device_id::SLB24, 0, Placement::Hops(1));
        let stray = add(&mut fabric, 0x41, vendor_id::VOLTAIRE, device_id::SLB24, 0, Placement::Hops(1));
        // The line board's first spine-facing link leads to another line board.
        fabric.connect(line, 1, stray, 2).unwrap();
        fabric.connect(spine, 1, line, 2).unwrap();

        let err = group_nodes(&mut fabric, &GroupingOptions::default()).unwrap_err();
        assert_eq!(
            err,
            InvariantViolation::UnknownHardwareModel {
                guid: Guid::new(0x41)
            }
        );
        assert_eq!(fabric.chassis_list().count(), 0);
        assert!(fabric.nodes().all(|(_, n)| !n.is_processed()));
    }
}
