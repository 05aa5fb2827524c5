// ── Core error types ──
//
// `CoreError` covers everything a caller can recover from: malformed
// snapshots, bad link requests, unreadable files. `InvariantViolation` is
// the fatal class: the wiring tables or classification logic do not match
// the hardware, and a grouping run that hits one is aborted as a whole.

use std::fmt;

use thiserror::Error;

use crate::model::Guid;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Fabric construction ──────────────────────────────────────────
    #[error("Duplicate node guid {guid}")]
    DuplicateNode { guid: Guid },

    #[error("Node not found: {guid}")]
    NodeNotFound { guid: Guid },

    #[error("Node {guid} is {hops} hops from the root, beyond the limit of {max}", max = crate::fabric::MAX_HOPS)]
    HopsOutOfRange { guid: Guid, hops: usize },

    #[error("Unknown node handle #{index}")]
    UnknownNode { index: usize },

    #[error("Port {port} out of range for node {guid} (1..={port_count})")]
    PortOutOfRange { guid: Guid, port: u8, port_count: u8 },

    #[error("Port {port} of node {guid} is already linked")]
    PortInUse { guid: Guid, port: u8 },

    // ── Snapshot loading ─────────────────────────────────────────────
    #[error("Invalid fabric snapshot: {message}")]
    Snapshot { message: String },

    #[error("Invalid JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML snapshot: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ── Fatal ────────────────────────────────────────────────────────
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// Which slot array an index was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotArray {
    Line,
    Spine,
}

impl fmt::Display for SlotArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line => f.write_str("line"),
            Self::Spine => f.write_str("spine"),
        }
    }
}

/// Violated internal invariant. Never recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("Unexpected node found: guid {guid} is not a known fabric board")]
    UnknownHardwareModel { guid: Guid },

    #[error("Internal error: {array} slot index {index} outside 1..={max} for node {guid}")]
    SlotIndexOutOfRange {
        guid: Guid,
        array: SlotArray,
        index: i32,
        max: usize,
    },

    #[error("Internal error: port {port} of node {guid} is outside the wiring tables")]
    WiringPortOutOfRange { guid: Guid, port: u8 },
}

impl InvariantViolation {
    /// The node whose classification broke the invariant.
    pub fn guid(&self) -> Guid {
        match self {
            Self::UnknownHardwareModel { guid }
            | Self::SlotIndexOutOfRange { guid, .. }
            | Self::WiringPortOutOfRange { guid, .. } => *guid,
        }
    }
}
