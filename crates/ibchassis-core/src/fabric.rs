// ── Discovered fabric arena ──
//
// Owns every node, port and chassis record of one discovery run. Nodes are
// filed into hop-distance buckets (plus a trailing endpoint bucket) which
// fix the traversal order of the grouping phases.

use indexmap::IndexMap;

use crate::error::CoreError;
use crate::model::{
    Chassis, ChassisId, Guid, Node, NodeId, NodeRecord, Placement, Port, PortId,
    SlotAssignment,
};

/// Deepest hop bucket discovery can produce.
pub const MAX_HOPS: usize = 63;

/// The node/port graph produced by discovery, plus the chassis list
/// written by grouping.
#[derive(Debug, Clone, Default)]
pub struct Fabric {
    nodes: Vec<Node>,
    ports: Vec<Port>,
    by_guid: IndexMap<Guid, NodeId>,
    /// `buckets[d]` holds the nodes discovered `d` hops from the root.
    buckets: Vec<Vec<NodeId>>,
    endpoints: Vec<NodeId>,
    chassis: Vec<Chassis>,
}

impl Fabric {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Construction ─────────────────────────────────────────────────

    /// Add a node with `port_count` ports numbered `1..=port_count`.
    pub fn add_node(
        &mut self,
        guid: Guid,
        record: NodeRecord,
        port_count: u8,
        placement: Placement,
    ) -> Result<NodeId, CoreError> {
        if self.by_guid.contains_key(&guid) {
            return Err(CoreError::DuplicateNode { guid });
        }
        if let Placement::Hops(hops) = placement {
            if hops > MAX_HOPS {
                return Err(CoreError::HopsOutOfRange { guid, hops });
            }
        }

        let id = NodeId(self.nodes.len());
        let ports = (1..=port_count)
            .map(|number| {
                let port = PortId(self.ports.len());
                self.ports.push(Port {
                    node: id,
                    number,
                    external: 0,
                    remote: None,
                });
                port
            })
            .collect();

        self.nodes.push(Node {
            guid,
            record,
            ports,
            placement,
            chassis: None,
            slot: SlotAssignment::default(),
            processed: false,
        });
        self.by_guid.insert(guid, id);

        match placement {
            Placement::Hops(hops) => {
                if self.buckets.len() <= hops {
                    self.buckets.resize_with(hops + 1, Vec::new);
                }
                self.buckets[hops].push(id);
            }
            Placement::Endpoint => self.endpoints.push(id),
        }

        Ok(id)
    }

    /// Record a symmetric link between `a:port_a` and `b:port_b`.
    pub fn connect(&mut self, a: NodeId, port_a: u8, b: NodeId, port_b: u8) -> Result<(), CoreError> {
        let pa = self.free_port(a, port_a)?;
        let pb = self.free_port(b, port_b)?;
        if pa == pb {
            return Err(CoreError::PortInUse {
                guid: self.nodes[a.0].guid,
                port: port_a,
            });
        }
        self.ports[pa.0].remote = Some(pb);
        self.ports[pb.0].remote = Some(pa);
        Ok(())
    }

    /// Record only the `a -> b` half of a link, as an incomplete discovery
    /// walk sometimes does.
    pub fn connect_one_way(
        &mut self,
        a: NodeId,
        port_a: u8,
        b: NodeId,
        port_b: u8,
    ) -> Result<(), CoreError> {
        let pa = self.free_port(a, port_a)?;
        let pb = self.port_handle(b, port_b)?;
        self.ports[pa.0].remote = Some(pb);
        Ok(())
    }

    fn port_handle(&self, node: NodeId, number: u8) -> Result<PortId, CoreError> {
        let n = self
            .nodes
            .get(node.0)
            .ok_or(CoreError::UnknownNode { index: node.0 })?;
        n.port(number).ok_or(CoreError::PortOutOfRange {
            guid: n.guid,
            port: number,
            port_count: n.port_count(),
        })
    }

    fn free_port(&self, node: NodeId, number: u8) -> Result<PortId, CoreError> {
        let port = self.port_handle(node, number)?;
        if self.ports[port.0].remote.is_some() {
            return Err(CoreError::PortInUse {
                guid: self.nodes[node.0].guid,
                port: number,
            });
        }
        Ok(port)
    }

    // ── Node / port access ───────────────────────────────────────────

    /// # Panics
    /// If `id` was not produced by this fabric.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// # Panics
    /// If `id` was not produced by this fabric.
    pub fn port(&self, id: PortId) -> &Port {
        &self.ports[id.0]
    }

    pub(crate) fn port_mut(&mut self, id: PortId) -> &mut Port {
        &mut self.ports[id.0]
    }

    pub fn find_node(&self, guid: Guid) -> Option<NodeId> {
        self.by_guid.get(&guid).copied()
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest populated hop bucket, if any node was placed by distance.
    pub fn max_hops(&self) -> Option<usize> {
        self.buckets.len().checked_sub(1)
    }

    /// Nodes in hop-distance order, nearest first. Endpoints excluded.
    pub fn hop_order(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.buckets.iter().flatten().copied()
    }

    /// Hop-distance order followed by the endpoint bucket.
    pub fn discovery_order(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.hop_order().chain(self.endpoints.iter().copied())
    }

    /// The node on the far end of `port`, if the link was discovered.
    pub fn remote_node(&self, port: PortId) -> Option<NodeId> {
        self.ports[port.0].remote.map(|remote| self.ports[remote.0].node)
    }

    /// `(local, remote)` port pairs for every discovered link of `node`.
    pub fn links(&self, node: NodeId) -> impl Iterator<Item = (&Port, &Port)> + '_ {
        self.nodes[node.0].ports.iter().filter_map(move |&pid| {
            let local = &self.ports[pid.0];
            local.remote.map(|remote| (local, &self.ports[remote.0]))
        })
    }

    // ── Chassis list ─────────────────────────────────────────────────

    /// # Panics
    /// If `id` was not produced by this fabric.
    pub fn chassis(&self, id: ChassisId) -> &Chassis {
        &self.chassis[id.0]
    }

    pub(crate) fn chassis_mut(&mut self, id: ChassisId) -> &mut Chassis {
        &mut self.chassis[id.0]
    }

    /// Every chassis record of the last grouping run, in creation order,
    /// including identity candidates that were never promoted.
    pub fn chassis_list(&self) -> impl Iterator<Item = (ChassisId, &Chassis)> {
        self.chassis
            .iter()
            .enumerate()
            .map(|(i, c)| (ChassisId(i), c))
    }

    /// Promoted chassis only (those with a chassis number).
    pub fn numbered_chassis(&self) -> impl Iterator<Item = (ChassisId, &Chassis)> {
        self.chassis_list().filter(|(_, c)| c.number().is_some())
    }

    pub fn find_chassis(&self, number: u32) -> Option<ChassisId> {
        self.chassis_list()
            .find(|(_, c)| c.number() == Some(number))
            .map(|(id, _)| id)
    }

    pub(crate) fn push_chassis(&mut self, chassis: Chassis) -> ChassisId {
        self.chassis.push(chassis);
        ChassisId(self.chassis.len() - 1)
    }

    /// Discard the results of any previous grouping run.
    pub(crate) fn reset_grouping(&mut self) {
        self.chassis.clear();
        for node in &mut self.nodes {
            node.reset_grouping();
        }
        for port in &mut self.ports {
            port.external = 0;
        }
    }
}
