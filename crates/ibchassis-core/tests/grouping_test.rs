#![allow(clippy::unwrap_used)]
// End-to-end grouping scenarios over hand-built fabrics.

use pretty_assertions::assert_eq;

use ibchassis_core::model::{device_id, vendor_id};
use ibchassis_core::{
    Fabric, GroupingOptions, GroupingStrategy, Guid, InvariantViolation, NodeId, NodeRecord,
    NodeType, Placement, SlotArray, SlotKind, group_nodes,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn rec(vendor: u32, device: u32, node_type: NodeType, sysimg: u64) -> NodeRecord {
    NodeRecord {
        vendor_id: vendor,
        device_id: device,
        node_type,
        system_image_guid: Guid::new(sysimg),
    }
}

fn node(fabric: &mut Fabric, guid: u64, record: NodeRecord, ports: u8, placement: Placement) -> NodeId {
    fabric
        .add_node(Guid::new(guid), record, ports, placement)
        .unwrap()
}

fn voltaire(fabric: &mut Fabric, guid: u64, device: u32, hops: usize) -> NodeId {
    node(
        fabric,
        guid,
        rec(vendor_id::VOLTAIRE, device, NodeType::Switch, 0),
        24,
        Placement::Hops(hops),
    )
}

type ChassisView = (Option<u32>, Guid, Vec<(usize, Guid)>, Vec<(usize, Guid)>, Vec<Guid>);

/// Everything a grouping run writes, in comparable form.
fn fingerprint(fabric: &Fabric) -> (Vec<ChassisView>, Vec<(Guid, bool, SlotKind, u8, u8)>) {
    let guid = |n: NodeId| fabric.node(n).guid();
    let chassis = fabric
        .chassis_list()
        .map(|(_, c)| {
            (
                c.number(),
                c.guid(),
                c.occupied_spines().map(|(i, n)| (i, guid(n))).collect(),
                c.occupied_lines().map(|(i, n)| (i, guid(n))).collect(),
                c.members().iter().map(|&n| guid(n)).collect(),
            )
        })
        .collect();
    let nodes = fabric
        .nodes()
        .map(|(_, n)| {
            let s = n.slot();
            (n.guid(), n.chassis().is_some(), s.kind, s.number, s.chip)
        })
        .collect();
    (chassis, nodes)
}

/// An ISR9288 with two fabric chips, four line chips, a router blade and
/// an attached host.
struct Isr9288 {
    fabric: Fabric,
    spine_a: NodeId,
    spine_b: NodeId,
    lines: [NodeId; 4],
    router: NodeId,
    host: NodeId,
}

fn isr9288() -> Isr9288 {
    let mut fabric = Fabric::new();
    let spine_a = voltaire(&mut fabric, 0x0008_f104_0400_000b, device_id::SFB12, 0);
    let spine_b = voltaire(&mut fabric, 0x0008_f104_0400_000c, device_id::SFB12_DDR, 1);
    let lines = [
        voltaire(&mut fabric, 0x0008_f104_0400_0101, device_id::SLB24, 1),
        voltaire(&mut fabric, 0x0008_f104_0400_0102, device_id::SLB24_DDR, 1),
        voltaire(&mut fabric, 0x0008_f104_0400_0103, device_id::SLB8, 1),
        voltaire(&mut fabric, 0x0008_f104_0400_0104, device_id::SLB24, 1),
    ];
    let router = node(
        &mut fabric,
        0x0008_f104_0400_0201,
        rec(vendor_id::VOLTAIRE, device_id::IB_FC_ROUTER, NodeType::Router, 0),
        2,
        Placement::Hops(1),
    );
    let host = node(
        &mut fabric,
        0x0002_c903_0000_0001,
        rec(0x02c9, 0x1003, NodeType::Ca, 0x0002_c903_0000_0000),
        2,
        Placement::Endpoint,
    );

    // Line port 1 reaches spine (1,1), port 2 reaches spine (1,2).
    // Spine ports 1..=4 reach line slots (1,1) (1,2) (2,1) (2,2).
    for (i, &line) in lines.iter().enumerate() {
        let spine_port = u8::try_from(i + 1).unwrap();
        fabric.connect(line, 1, spine_a, spine_port).unwrap();
        fabric.connect(line, 2, spine_b, spine_port).unwrap();
    }
    fabric.connect(router, 1, spine_a, 5).unwrap();
    fabric.connect(host, 1, lines[0], 13).unwrap();

    Isr9288 {
        fabric,
        spine_a,
        spine_b,
        lines,
        router,
        host,
    }
}

// ── Topology scenarios ──────────────────────────────────────────────

#[test]
fn test_isr2004_spine_with_three_lines() {
    let mut fabric = Fabric::new();
    let spine = voltaire(&mut fabric, 0x0008_f104_0040_00a1, device_id::SFB2004, 0);
    let lines: Vec<NodeId> = (0..3)
        .map(|i| voltaire(&mut fabric, 0x0008_f104_0040_00b1 + i, device_id::SLB2024, 1))
        .collect();
    // Spine ports 1, 4 and 7 lead to line slots (1,1), (1,2) and (2,1).
    for (&line, spine_port) in lines.iter().zip([1, 4, 7]) {
        fabric.connect(spine, spine_port, line, 1).unwrap();
    }

    let summary = group_nodes(&mut fabric, &GroupingOptions::default()).unwrap();
    assert_eq!(summary.chassis, 1);
    assert_eq!(summary.grouped_nodes, 4);

    let (id, chassis) = fabric.numbered_chassis().next().unwrap();
    assert_eq!(chassis.number(), Some(1));
    assert_eq!(chassis.strategy(), GroupingStrategy::Topology);
    assert_eq!(chassis.occupied_spines().collect::<Vec<_>>(), [(1, spine)]);
    assert_eq!(
        chassis.occupied_lines().collect::<Vec<_>>(),
        [(1, lines[0]), (2, lines[1]), (4, lines[2])]
    );
    assert_eq!(chassis.guid(), Guid::new(0x0008_f104_0040_00a0));
    assert!(lines.iter().all(|&l| fabric.node(l).chassis() == Some(id)));
}

#[test]
fn test_isr9288_full_chassis() {
    let Isr9288 {
        mut fabric,
        spine_a,
        spine_b,
        lines,
        router,
        host,
    } = isr9288();

    group_nodes(&mut fabric, &GroupingOptions::default()).unwrap();

    let (_, chassis) = fabric.numbered_chassis().next().unwrap();
    assert_eq!(
        chassis.occupied_spines().collect::<Vec<_>>(),
        [(1, spine_a), (2, spine_b)]
    );
    // Spine port 5 => router slot 3; guid % 4 == 3 => chip 1.
    assert_eq!(
        chassis.occupied_lines().collect::<Vec<_>>(),
        [(1, lines[0]), (2, lines[1]), (4, lines[2]), (5, lines[3]), (7, router)]
    );
    assert_eq!(fabric.node(router).slot().kind, SlotKind::RouterBlade);
    assert_eq!(fabric.node(host).chassis(), None);

    // sLB-24 chip 1, chip port 13 is front-panel port 6.
    let port = fabric.node(lines[0]).port(13).unwrap();
    assert_eq!(fabric.port(port).external_number(), 6);
}

#[test]
fn test_grouped_modules_have_valid_positions() {
    let Isr9288 { mut fabric, .. } = isr9288();
    group_nodes(&mut fabric, &GroupingOptions::default()).unwrap();

    for (_, node) in fabric.nodes() {
        if node.chassis().is_none() || node.vendor() != ibchassis_core::Vendor::Voltaire {
            continue;
        }
        let slot = node.slot();
        assert!(node.is_processed());
        match slot.kind {
            SlotKind::Line | SlotKind::RouterBlade => {
                assert!((1..=12).contains(&slot.number), "{}", node.guid());
                assert!((1..=3).contains(&slot.chip), "{}", node.guid());
            }
            SlotKind::Spine => {
                assert!((1..=4).contains(&slot.number), "{}", node.guid());
                assert!((1..=3).contains(&slot.chip), "{}", node.guid());
            }
            SlotKind::Unresolved => panic!("grouped node {} has no slot", node.guid()),
        }
    }
}

#[test]
fn test_no_node_occupies_two_slots() {
    let Isr9288 { mut fabric, .. } = isr9288();
    group_nodes(&mut fabric, &GroupingOptions::default()).unwrap();

    let mut seen: Vec<NodeId> = fabric
        .chassis_list()
        .flat_map(|(_, c)| c.nodes())
        .collect();
    let total = seen.len();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), total);
}

#[test]
fn test_regrouping_is_deterministic() {
    let Isr9288 { mut fabric, .. } = isr9288();

    group_nodes(&mut fabric, &GroupingOptions::default()).unwrap();
    let first = fingerprint(&fabric);
    group_nodes(&mut fabric, &GroupingOptions::default()).unwrap();
    assert_eq!(fingerprint(&fabric), first);

    let Isr9288 {
        fabric: mut fresh, ..
    } = isr9288();
    group_nodes(&mut fresh, &GroupingOptions::default()).unwrap();
    assert_eq!(fingerprint(&fresh), first);
}

// ── Degraded connectivity ───────────────────────────────────────────

#[test]
fn test_one_way_link_from_spine_is_tolerated() {
    let Isr9288 { mut fabric, spine_a, .. } = isr9288();
    let orphan = voltaire(&mut fabric, 0x0008_f104_0400_0105, device_id::SLB24, 2);
    fabric.connect_one_way(spine_a, 6, orphan, 1).unwrap();

    let summary = group_nodes(&mut fabric, &GroupingOptions::default()).unwrap();
    assert_eq!(summary.topology_chassis, 1);
    assert!(fabric.node(orphan).is_processed());
    assert_eq!(fabric.node(orphan).slot().kind, SlotKind::Unresolved);
    assert_eq!(fabric.node(orphan).chassis(), None);
}

#[test]
fn test_one_way_link_from_line_is_tolerated() {
    let Isr9288 { mut fabric, spine_a, .. } = isr9288();
    let orphan = voltaire(&mut fabric, 0x0008_f104_0400_0105, device_id::SLB24, 2);
    fabric.connect_one_way(orphan, 1, spine_a, 6).unwrap();

    let summary = group_nodes(&mut fabric, &GroupingOptions::default()).unwrap();
    assert_eq!(summary.topology_chassis, 1);
    // Positioned from its own link, but no chassis member links back to it.
    assert_eq!(fabric.node(orphan).slot().kind, SlotKind::Line);
    assert_eq!(fabric.node(orphan).chassis(), None);
}

// ── Fatal invariants ────────────────────────────────────────────────

#[test]
fn test_spine_positioned_off_chip_port_is_fatal() {
    let mut fabric = Fabric::new();
    let spine = voltaire(&mut fabric, 0x11, device_id::SFB4, 0);
    let line = voltaire(&mut fabric, 0x21, device_id::SLB24, 1);
    fabric.connect(spine, 1, line, 13).unwrap();

    let err = group_nodes(&mut fabric, &GroupingOptions::default()).unwrap_err();
    assert_eq!(
        err,
        InvariantViolation::SlotIndexOutOfRange {
            guid: Guid::new(0x11),
            array: SlotArray::Spine,
            index: 0,
            max: 18,
        }
    );
    assert_eq!(fabric.chassis_list().count(), 0);
}

#[test]
fn test_router_beyond_wiring_tables_is_fatal() {
    let mut fabric = Fabric::new();
    let spine = node(
        &mut fabric,
        0x11,
        rec(vendor_id::VOLTAIRE, device_id::SFB2012, NodeType::Switch, 0),
        36,
        Placement::Hops(0),
    );
    let router = node(
        &mut fabric,
        0x31,
        rec(vendor_id::VOLTAIRE, device_id::IB_IP_ROUTER, NodeType::Router, 0),
        1,
        Placement::Hops(1),
    );
    fabric.connect(spine, 30, router, 1).unwrap();

    let err = group_nodes(&mut fabric, &GroupingOptions::default()).unwrap_err();
    assert_eq!(
        err,
        InvariantViolation::WiringPortOutOfRange {
            guid: Guid::new(0x11),
            port: 30,
        }
    );
}

// ── Identity scenarios ──────────────────────────────────────────────

#[test]
fn test_shared_identity_forms_one_chassis() {
    let mut fabric = Fabric::new();
    // Same Topspin system image, different slot bytes, no link.
    let a = node(
        &mut fabric,
        0x0005_ad00_0000_0a01,
        rec(vendor_id::TOPSPIN, 0xa87c, NodeType::Switch, 0x0005_ad00_0300_0a00),
        24,
        Placement::Hops(0),
    );
    let b = node(
        &mut fabric,
        0x0005_ad00_0000_0a02,
        rec(vendor_id::TOPSPIN, 0xa87c, NodeType::Switch, 0x0005_ad00_0700_0a00),
        24,
        Placement::Hops(3),
    );

    let summary = group_nodes(&mut fabric, &GroupingOptions::default()).unwrap();
    assert_eq!(summary.identity_chassis, 1);

    let (id, chassis) = fabric.numbered_chassis().next().unwrap();
    assert_eq!(chassis.number(), Some(1));
    assert_eq!(chassis.node_count(), 2);
    assert_eq!(chassis.members(), [a, b]);
    assert_eq!(chassis.guid(), Guid::new(0x0005_ad00_0000_0a00));
    assert_eq!(fabric.node(a).chassis(), Some(id));
    assert_eq!(fabric.node(b).chassis(), Some(id));
}

#[test]
fn test_lone_identity_is_never_promoted() {
    let mut fabric = Fabric::new();
    let lone = node(
        &mut fabric,
        0x0002_c903_00aa_0001,
        rec(0x02c9, 0xbd36, NodeType::Switch, 0x0002_c903_00aa_0000),
        36,
        Placement::Hops(0),
    );

    let summary = group_nodes(&mut fabric, &GroupingOptions::default()).unwrap();
    assert_eq!(summary.chassis, 0);
    assert_eq!(summary.ungrouped_nodes, 1);

    let entries: Vec<_> = fabric.chassis_list().collect();
    assert_eq!(entries.len(), 1);
    let (_, entry) = entries[0];
    assert_eq!(entry.node_count(), 1);
    assert_eq!(entry.number(), None);
    assert_eq!(fabric.node(lone).chassis(), None);
    assert!(!fabric.node(lone).is_processed());
}

#[test]
fn test_threshold_raises_promotion_bar() {
    let mut fabric = Fabric::new();
    for i in 0..2 {
        node(
            &mut fabric,
            0x100 + i,
            rec(0x02c9, 0xbd36, NodeType::Switch, 0xfeed),
            36,
            Placement::Hops(0),
        );
    }

    let options = GroupingOptions {
        min_identity_members: 3,
        ..GroupingOptions::default()
    };
    assert_eq!(group_nodes(&mut fabric, &options).unwrap().chassis, 0);
    assert_eq!(
        group_nodes(&mut fabric, &GroupingOptions::default()).unwrap().chassis,
        1
    );
}
