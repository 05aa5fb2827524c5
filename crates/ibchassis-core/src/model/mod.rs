// ── Domain model ──
//
// Arena-addressed nodes, ports and chassis plus the hardware vocabulary
// used to classify them.

pub mod chassis;
pub mod hardware;
pub mod ids;
pub mod node;

pub use chassis::{Chassis, GroupingStrategy, LINES_MAX, SPINES_MAX};
pub use hardware::{ChassisModel, LineModel, SlotKind, Vendor, device_id, vendor_id};
pub use ids::{ChassisId, Guid, NodeId, PortId};
pub use node::{
    FieldValue, Node, NodeField, NodeRecord, NodeType, Placement, Port, SlotAssignment,
};
