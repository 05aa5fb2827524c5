// ── Hardware vocabulary ──
//
// Closed enumerations for the vendors, chassis generations, line-board
// models and slot kinds the grouping engine understands.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Vendor ids as reported in the node management record.
pub mod vendor_id {
    pub const VOLTAIRE: u32 = 0x08f1;
    pub const TOPSPIN: u32 = 0x05ad;
    pub const SILVERSTORM: u32 = 0x066a;
    pub const XSIGO: u32 = 0x1397;
}

/// Voltaire device ids.
pub mod device_id {
    pub const IB_FC_ROUTER: u32 = 0x5a00;
    pub const IB_IP_ROUTER: u32 = 0x5a01;
    pub const SFB12: u32 = 0x5a08;
    pub const SLB24: u32 = 0x5a09;
    pub const SFB4: u32 = 0x5a0b;
    pub const SLB8: u32 = 0x5a0d;
    pub const SFB12_DDR: u32 = 0x5a32;
    pub const SFB4_DDR: u32 = 0x5a33;
    pub const SLB24_DDR: u32 = 0x5a34;
    pub const SFB2012: u32 = 0x5a37;
    pub const SLB2024: u32 = 0x5a38;
    pub const SFB2004: u32 = 0x5a40;
    pub const SRB2004: u32 = 0x5a42;
}

// ── Vendor ──────────────────────────────────────────────────────────

/// Vendor family, which decides the grouping strategy for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vendor {
    /// Grouped by walking intra-chassis links.
    Voltaire,
    Topspin,
    SilverStorm,
    Xsigo,
    Other(u32),
}

impl Vendor {
    pub fn from_id(id: u32) -> Self {
        match id {
            vendor_id::VOLTAIRE => Self::Voltaire,
            vendor_id::TOPSPIN => Self::Topspin,
            vendor_id::SILVERSTORM => Self::SilverStorm,
            vendor_id::XSIGO => Self::Xsigo,
            other => Self::Other(other),
        }
    }

    pub fn id(self) -> u32 {
        match self {
            Self::Voltaire => vendor_id::VOLTAIRE,
            Self::Topspin => vendor_id::TOPSPIN,
            Self::SilverStorm => vendor_id::SILVERSTORM,
            Self::Xsigo => vendor_id::XSIGO,
            Self::Other(id) => id,
        }
    }

    /// Chassis membership for this vendor is inferred from link topology
    /// rather than from a shared system-image guid.
    pub fn is_topology_grouped(self) -> bool {
        matches!(self, Self::Voltaire)
    }
}

// ── Chassis generations ─────────────────────────────────────────────

/// The four fabric-board generations with known internal wiring.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum ChassisModel {
    /// sFB-12 fabric boards with three chips each, up to 12 line slots.
    #[strum(serialize = "ISR9288")]
    #[serde(rename = "ISR9288")]
    Isr9288,
    /// Single-chip sFB-4 fabric boards, up to 4 line slots.
    #[strum(serialize = "ISR9096")]
    #[serde(rename = "ISR9096")]
    Isr9096,
    #[strum(serialize = "ISR2012")]
    #[serde(rename = "ISR2012")]
    Isr2012,
    #[strum(serialize = "ISR2004")]
    #[serde(rename = "ISR2004")]
    Isr2004,
}

impl ChassisModel {
    /// Human-readable model label used by reporting tools.
    pub fn label(self) -> &'static str {
        self.into()
    }

    /// Spine flat index is `3 * (slot - 1) + chip` on 12-chip fabric
    /// boards, plain `slot` otherwise.
    pub fn has_multichip_spines(self) -> bool {
        matches!(self, Self::Isr9288 | Self::Isr2012)
    }
}

/// Line-board models, which differ only in their front-panel port map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum LineModel {
    #[strum(serialize = "sLB-24")]
    Slb24,
    #[strum(serialize = "sLB-8")]
    Slb8,
    #[strum(serialize = "sLB-2024")]
    Slb2024,
}

// ── Slot kind ───────────────────────────────────────────────────────

/// What kind of chassis slot a module occupies.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    #[default]
    #[strum(serialize = "Unresolved")]
    Unresolved,
    #[strum(serialize = "Line")]
    Line,
    #[strum(serialize = "Spine")]
    Spine,
    #[strum(serialize = "SRBD")]
    RouterBlade,
}

impl SlotKind {
    pub fn is_resolved(self) -> bool {
        !matches!(self, Self::Unresolved)
    }

    /// Line boards and router blades share the line slot array.
    pub fn uses_line_array(self) -> bool {
        matches!(self, Self::Line | Self::RouterBlade)
    }
}
