// ── Chassis record ──

use serde::{Deserialize, Serialize};

use super::ids::{Guid, NodeId};

/// Highest flat index of the line/router slot array.
pub const LINES_MAX: usize = 36;
/// Highest flat index of the spine slot array.
pub const SPINES_MAX: usize = 18;

/// How a chassis was inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingStrategy {
    /// Reconstructed by walking links between fabric and line boards.
    Topology,
    /// Nodes sharing a (normalized) system-image guid.
    Identity,
}

/// A physical enclosure reconstructed during one grouping run.
///
/// Slot arrays are indexed `1..=LINES_MAX` / `1..=SPINES_MAX`; index 0 is
/// never occupied. A slot, once filled, is never overwritten.
#[derive(Debug, Clone)]
pub struct Chassis {
    pub(crate) number: Option<u32>,
    pub(crate) guid: Guid,
    pub(crate) strategy: GroupingStrategy,
    pub(crate) lines: [Option<NodeId>; LINES_MAX + 1],
    pub(crate) spines: [Option<NodeId>; SPINES_MAX + 1],
    pub(crate) node_count: u32,
    pub(crate) members: Vec<NodeId>,
}

impl Chassis {
    pub(crate) fn new(strategy: GroupingStrategy) -> Self {
        Self {
            number: None,
            guid: Guid::ZERO,
            strategy,
            lines: [None; LINES_MAX + 1],
            spines: [None; SPINES_MAX + 1],
            node_count: 0,
            members: Vec::new(),
        }
    }

    /// 1-based chassis number; `None` until the chassis is promoted.
    pub fn number(&self) -> Option<u32> {
        self.number
    }

    pub fn guid(&self) -> Guid {
        self.guid
    }

    pub fn strategy(&self) -> GroupingStrategy {
        self.strategy
    }

    /// Nodes counted against this chassis identity.
    pub fn node_count(&self) -> u32 {
        self.node_count
    }

    /// Identity-grouped members in promotion order.
    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    pub fn line(&self, index: usize) -> Option<NodeId> {
        self.lines.get(index).copied().flatten()
    }

    pub fn spine(&self, index: usize) -> Option<NodeId> {
        self.spines.get(index).copied().flatten()
    }

    /// Occupied line/router slots as `(flat index, node)`.
    pub fn occupied_lines(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        occupied(&self.lines)
    }

    /// Occupied spine slots as `(flat index, node)`.
    pub fn occupied_spines(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        occupied(&self.spines)
    }

    /// Every node attributed to this chassis, spines first.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self.occupied_spines().map(|(_, n)| n).collect();
        nodes.extend(self.occupied_lines().map(|(_, n)| n));
        nodes.extend(self.members.iter().copied());
        nodes
    }

    /// First writer wins. Returns `true` if `node` took the slot.
    pub(crate) fn insert_line(&mut self, index: usize, node: NodeId) -> bool {
        fill(&mut self.lines, index, node)
    }

    /// First writer wins. Returns `true` if `node` took the slot.
    pub(crate) fn insert_spine(&mut self, index: usize, node: NodeId) -> bool {
        fill(&mut self.spines, index, node)
    }
}

fn occupied(slots: &[Option<NodeId>]) -> impl Iterator<Item = (usize, NodeId)> + '_ {
    slots
        .iter()
        .enumerate()
        .filter_map(|(i, slot)| slot.map(|node| (i, node)))
}

fn fill(slots: &mut [Option<NodeId>], index: usize, node: NodeId) -> bool {
    if index == 0 {
        return false;
    }
    match slots.get_mut(index) {
        Some(slot) if slot.is_none() => {
            *slot = Some(node);
            true
        }
        _ => false,
    }
}
