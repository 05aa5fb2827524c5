// ── Node and port domain types ──
//
// A node is a discovered switch, router or channel adapter; its ports are
// owned by the node and addressed through the fabric arena. Remote links
// are non-owning `PortId` edges.

use serde::{Deserialize, Serialize};
use strum::Display;

use super::hardware::{ChassisModel, SlotKind, Vendor};
use super::ids::{ChassisId, Guid, NodeId, PortId};

// ── Management record ───────────────────────────────────────────────

/// Node type as encoded in the node management record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeType {
    #[serde(alias = "channel_adapter")]
    #[strum(serialize = "ca")]
    Ca,
    Switch,
    Router,
}

impl NodeType {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            1 => Some(Self::Ca),
            2 => Some(Self::Switch),
            3 => Some(Self::Router),
            _ => None,
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            Self::Ca => 1,
            Self::Switch => 2,
            Self::Router => 3,
        }
    }
}

/// Named fields of the management record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeField {
    VendorId,
    DeviceId,
    NodeType,
    SystemImageGuid,
}

/// A raw field value: the record only carries 32- and 64-bit integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    U32(u32),
    U64(u64),
}

impl FieldValue {
    pub fn as_u64(self) -> u64 {
        match self {
            Self::U32(v) => u64::from(v),
            Self::U64(v) => v,
        }
    }

    /// `None` when a 64-bit value does not fit.
    pub fn as_u32(self) -> Option<u32> {
        match self {
            Self::U32(v) => Some(v),
            Self::U64(v) => u32::try_from(v).ok(),
        }
    }
}

/// The subset of a node's management record the grouping engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub vendor_id: u32,
    pub device_id: u32,
    pub node_type: NodeType,
    #[serde(default)]
    pub system_image_guid: Guid,
}

impl NodeRecord {
    /// Field accessor in the shape the discovery layer exposes.
    pub fn field(&self, field: NodeField) -> FieldValue {
        match field {
            NodeField::VendorId => FieldValue::U32(self.vendor_id),
            NodeField::DeviceId => FieldValue::U32(self.device_id),
            NodeField::NodeType => FieldValue::U32(self.node_type.raw()),
            NodeField::SystemImageGuid => FieldValue::U64(self.system_image_guid.get()),
        }
    }

    pub fn vendor(&self) -> Vendor {
        Vendor::from_id(self.field(NodeField::VendorId).as_u32().unwrap_or_default())
    }

    pub fn system_image_guid(&self) -> Guid {
        Guid::new(self.field(NodeField::SystemImageGuid).as_u64())
    }
}

// ── Placement ───────────────────────────────────────────────────────

/// Where discovery filed a node: a hop-distance bucket, or the trailing
/// endpoint bucket used for channel adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Hops(usize),
    Endpoint,
}

// ── Slot assignment ─────────────────────────────────────────────────

/// Position of a module inside its chassis.
///
/// Only meaningful once the node is processed and `kind` is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub kind: SlotKind,
    pub model: Option<ChassisModel>,
    /// Physical slot number, 1-based.
    pub number: u8,
    /// Switching chip on the board, 1-based.
    pub chip: u8,
}

impl SlotAssignment {
    pub fn is_resolved(&self) -> bool {
        self.kind.is_resolved()
    }
}

// ── Node ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) guid: Guid,
    pub(crate) record: NodeRecord,
    /// Port `n` lives at `ports[n - 1]`.
    pub(crate) ports: Vec<PortId>,
    pub(crate) placement: Placement,
    pub(crate) chassis: Option<ChassisId>,
    pub(crate) slot: SlotAssignment,
    pub(crate) processed: bool,
}

impl Node {
    pub fn guid(&self) -> Guid {
        self.guid
    }

    pub fn record(&self) -> &NodeRecord {
        &self.record
    }

    pub fn vendor(&self) -> Vendor {
        self.record.vendor()
    }

    pub fn node_type(&self) -> NodeType {
        self.record.node_type
    }

    pub fn system_image_guid(&self) -> Guid {
        self.record.system_image_guid()
    }

    pub fn port_count(&self) -> u8 {
        u8::try_from(self.ports.len()).unwrap_or(u8::MAX)
    }

    /// Port handle for a 1-based port number.
    pub fn port(&self, number: u8) -> Option<PortId> {
        let index = usize::from(number).checked_sub(1)?;
        self.ports.get(index).copied()
    }

    /// Port handles in port-number order.
    pub fn ports(&self) -> &[PortId] {
        &self.ports
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn chassis(&self) -> Option<ChassisId> {
        self.chassis
    }

    pub fn slot(&self) -> SlotAssignment {
        self.slot
    }

    pub fn is_processed(&self) -> bool {
        self.processed
    }

    /// Drop everything a grouping run writes onto the node.
    pub(crate) fn reset_grouping(&mut self) {
        self.chassis = None;
        self.slot = SlotAssignment::default();
        self.processed = false;
    }
}

// ── Port ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Port {
    pub(crate) node: NodeId,
    pub(crate) number: u8,
    /// Front-panel label; 0 when not applicable.
    pub(crate) external: u8,
    pub(crate) remote: Option<PortId>,
}

impl Port {
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn external_number(&self) -> u8 {
        self.external
    }

    pub fn remote(&self) -> Option<PortId> {
        self.remote
    }
}
