// ── Serializable reports ──
//
// Owned snapshots of grouping results for renderers. Built from a grouped
// `Fabric`; they never borrow from it.

use serde::Serialize;

use crate::fabric::Fabric;
use crate::model::{
    ChassisId, ChassisModel, GroupingStrategy, Guid, NodeId, NodeType, SlotKind,
};
use crate::query;

// ── Run summary ─────────────────────────────────────────────────────

/// Statistics of one grouping run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupingSummary {
    /// Numbered chassis of either strategy.
    pub chassis: usize,
    pub topology_chassis: usize,
    pub identity_chassis: usize,
    pub grouped_nodes: usize,
    pub ungrouped_nodes: usize,
}

impl GroupingSummary {
    pub fn collect(fabric: &Fabric) -> Self {
        let mut summary = Self::default();
        for (_, chassis) in fabric.numbered_chassis() {
            summary.chassis += 1;
            match chassis.strategy() {
                GroupingStrategy::Topology => summary.topology_chassis += 1,
                GroupingStrategy::Identity => summary.identity_chassis += 1,
            }
        }
        summary.grouped_nodes = fabric
            .nodes()
            .filter(|(_, node)| node.chassis().is_some())
            .count();
        summary.ungrouped_nodes = fabric.node_count() - summary.grouped_nodes;
        summary
    }
}

// ── Chassis ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotEntry {
    /// Flat index into the chassis slot array.
    pub index: usize,
    pub guid: Guid,
    pub kind: SlotKind,
    pub slot: u8,
    pub chip: u8,
}

impl SlotEntry {
    fn new(fabric: &Fabric, index: usize, node: NodeId) -> Self {
        let n = fabric.node(node);
        let slot = n.slot();
        Self {
            index,
            guid: n.guid(),
            kind: slot.kind,
            slot: slot.number,
            chip: slot.chip,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChassisReport {
    pub number: Option<u32>,
    pub guid: Guid,
    pub strategy: GroupingStrategy,
    pub model: Option<ChassisModel>,
    pub node_count: u32,
    pub spines: Vec<SlotEntry>,
    pub lines: Vec<SlotEntry>,
    pub members: Vec<Guid>,
}

impl ChassisReport {
    pub fn new(fabric: &Fabric, id: ChassisId) -> Self {
        let chassis = fabric.chassis(id);
        let spines: Vec<SlotEntry> = chassis
            .occupied_spines()
            .map(|(index, node)| SlotEntry::new(fabric, index, node))
            .collect();
        let model = chassis
            .occupied_spines()
            .find_map(|(_, node)| fabric.node(node).slot().model);

        Self {
            number: chassis.number(),
            guid: chassis.guid(),
            strategy: chassis.strategy(),
            model,
            node_count: chassis.node_count(),
            spines,
            lines: chassis
                .occupied_lines()
                .map(|(index, node)| SlotEntry::new(fabric, index, node))
                .collect(),
            members: chassis
                .members()
                .iter()
                .map(|&node| fabric.node(node).guid())
                .collect(),
        }
    }

    /// Every module attributed to the chassis.
    pub fn module_count(&self) -> usize {
        self.spines.len() + self.lines.len() + self.members.len()
    }

    /// Reports for every numbered chassis, in numbering order.
    pub fn all(fabric: &Fabric) -> Vec<Self> {
        let mut reports: Vec<Self> = fabric
            .numbered_chassis()
            .map(|(id, _)| Self::new(fabric, id))
            .collect();
        reports.sort_by_key(|r| r.number);
        reports
    }
}

// ── Nodes and ports ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeReport {
    pub guid: Guid,
    pub vendor_id: u32,
    pub device_id: u32,
    pub node_type: NodeType,
    pub system_image_guid: Guid,
    pub chassis: Option<u32>,
    pub kind: SlotKind,
    pub slot: Option<u8>,
    pub chip: Option<u8>,
    pub model: Option<&'static str>,
    pub description: Option<String>,
}

impl NodeReport {
    pub fn new(fabric: &Fabric, id: NodeId) -> Self {
        let node = fabric.node(id);
        let record = node.record();
        let slot = node.slot();
        let resolved = node.is_processed() && slot.is_resolved();

        Self {
            guid: node.guid(),
            vendor_id: record.vendor_id,
            device_id: record.device_id,
            node_type: record.node_type,
            system_image_guid: record.system_image_guid,
            chassis: node
                .chassis()
                .and_then(|chassis| fabric.chassis(chassis).number()),
            kind: slot.kind,
            slot: resolved.then_some(slot.number),
            chip: resolved.then_some(slot.chip),
            model: query::chassis_model_label(fabric, id),
            description: query::slot_description(fabric, id).map(|d| d.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RemoteEnd {
    pub guid: Guid,
    pub port: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortReport {
    pub port: u8,
    /// Front-panel label, when the port has one.
    pub external: Option<u8>,
    pub remote: Option<RemoteEnd>,
}

impl PortReport {
    /// One entry per port of `node`, in port-number order.
    pub fn for_node(fabric: &Fabric, node: NodeId) -> Vec<Self> {
        fabric
            .node(node)
            .ports()
            .iter()
            .map(|&pid| {
                let port = fabric.port(pid);
                let remote = port.remote().map(|rid| {
                    let far = fabric.port(rid);
                    RemoteEnd {
                        guid: fabric.node(far.node()).guid(),
                        port: far.number(),
                    }
                });
                Self {
                    port: port.number(),
                    external: Some(port.external_number()).filter(|&e| e != 0),
                    remote,
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::group::{GroupingOptions, group_nodes};
    use crate::model::{NodeRecord, Placement, device_id, vendor_id};
    use pretty_assertions::assert_eq;

    fn voltaire(fabric: &mut Fabric, guid: u64, device: u32) -> NodeId {
        fabric
            .add_node(
                Guid::new(guid),
                NodeRecord {
                    vendor_id: vendor_id::VOLTAIRE,
                    device_id: device,
                    node_type: NodeType::Switch,
                    system_image_guid: Guid::ZERO,
                },
                24,
                Placement::Hops(0),
            )
            .unwrap()
    }

    #[test]
    fn chassis_report_lists_slots() {
        let mut fabric = Fabric::new();
        let spine = voltaire(&mut fabric, 0x11, device_id::SFB4);
        let line = voltaire(&mut fabric, 0x21, device_id::SLB8);
        fabric.connect(spine, 1, line, 1).unwrap();
        let summary = group_nodes(&mut fabric, &GroupingOptions::default()).unwrap();

        assert_eq!(
            summary,
            GroupingSummary {
                chassis: 1,
                topology_chassis: 1,
                identity_chassis: 0,
                grouped_nodes: 2,
                ungrouped_nodes: 0,
            }
        );

        let reports = ChassisReport::all(&fabric);
        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.number, Some(1));
        assert_eq!(report.guid, Guid::new(0x10));
        assert_eq!(report.model, Some(ChassisModel::Isr9096));
        assert_eq!(
            report.lines,
            [SlotEntry {
                index: 1,
                guid: Guid::new(0x21),
                kind: SlotKind::Line,
                slot: 1,
                chip: 1,
            }]
        );
        assert_eq!(report.module_count(), 2);
    }

    #[test]
    fn port_report_shows_front_panel_labels() {
        let mut fabric = Fabric::new();
        let spine = voltaire(&mut fabric, 0x11, device_id::SFB4);
        let line = voltaire(&mut fabric, 0x21, device_id::SLB8);
        fabric.connect(spine, 1, line, 1).unwrap();
        group_nodes(&mut fabric, &GroupingOptions::default()).unwrap();

        let ports = PortReport::for_node(&fabric, line);
        assert_eq!(ports.len(), 24);
        assert_eq!(
            ports[0],
            PortReport {
                port: 1,
                external: None,
                remote: Some(RemoteEnd {
                    guid: Guid::new(0x11),
                    port: 1
                }),
            }
        );
        assert_eq!(ports[12].external, Some(2));

        let node = NodeReport::new(&fabric, line);
        assert_eq!(node.chassis, Some(1));
        assert_eq!(node.description.as_deref(), Some("Line 1 Chip 1"));
        assert_eq!(node.model, Some("ISR9096"));
    }
}
