// ibchassis-core: Chassis topology inference over a discovered fabric graph.
//
// Discovery hands over nodes, ports and links; grouping infers which
// modules share a physical enclosure and where each one sits in it.

pub mod classify;
pub mod error;
pub mod fabric;
pub mod group;
pub mod identity;
pub mod model;
pub mod portmap;
pub mod query;
pub mod report;
pub mod snapshot;
pub mod wiring;

mod builder;
mod walker;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::{CoreError, InvariantViolation, SlotArray};
pub use fabric::{Fabric, MAX_HOPS};
pub use group::{GroupingOptions, MIN_IDENTITY_MEMBERS, group_nodes};
pub use query::{SlotDescription, chassis_model, chassis_model_label, slot_description};
pub use report::{ChassisReport, GroupingSummary, NodeReport, PortReport, RemoteEnd, SlotEntry};
pub use snapshot::{FabricSnapshot, LinkEnd, SnapshotFormat, SnapshotLink, SnapshotNode};

pub use model::{
    // Arena handles
    ChassisId, Guid, NodeId, PortId,
    // Graph records
    Chassis, GroupingStrategy, Node, NodeField, NodeRecord, NodeType, Placement, Port,
    FieldValue, SlotAssignment,
    // Hardware vocabulary
    ChassisModel, LineModel, SlotKind, Vendor, LINES_MAX, SPINES_MAX,
};
