// ── Core identity types ──
//
// `Guid` is the 64-bit identifier carried by nodes, system images and
// chassis. `NodeId`, `PortId` and `ChassisId` are stable indices into the
// arenas owned by a `Fabric`; links between ports are stored as these
// indices so the (cyclic) discovery graph never needs shared ownership.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

// ── Guid ────────────────────────────────────────────────────────────

/// A 64-bit globally unique identifier, rendered as `0x%016x`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Guid(u64);

impl Guid {
    pub const ZERO: Self = Self(0);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Keep only the bits set in `mask`.
    pub const fn masked(self, mask: u64) -> Self {
        Self(self.0 & mask)
    }

    pub const fn wrapping_pred(self) -> Self {
        Self(self.0.wrapping_sub(1))
    }

    /// True when the bits selected by `mask` equal `pattern`.
    pub const fn matches(self, mask: u64, pattern: u64) -> bool {
        self.0 & mask == pattern
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

impl fmt::LowerHex for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl FromStr for Guid {
    type Err = ParseIntError;

    /// Accepts `0x`-prefixed hex (the usual notation) or plain decimal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let raw = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16)?,
            None => s.parse()?,
        };
        Ok(Self(raw))
    }
}

impl From<u64> for Guid {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<Guid> for u64 {
    fn from(guid: Guid) -> Self {
        guid.0
    }
}

impl Serialize for Guid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Guid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(v) => Ok(Self(v)),
            Raw::Text(s) => s
                .parse()
                .map_err(|e| serde::de::Error::custom(format!("invalid guid '{s}': {e}"))),
        }
    }
}

// ── Arena handles ───────────────────────────────────────────────────

/// Index of a node in its `Fabric`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a port in its `Fabric`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId(pub(crate) usize);

impl PortId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a chassis record in its `Fabric`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChassisId(pub(crate) usize);

impl ChassisId {
    pub fn index(self) -> usize {
        self.0
    }
}
