//! Shared helpers for command handlers.

use ibchassis_core::{
    Fabric, FabricSnapshot, GroupingOptions, GroupingSummary, Guid, NodeId, group_nodes,
};
use tracing::debug;

use crate::config::FabricSource;
use crate::error::CliError;

/// A snapshot loaded and grouped, ready for the read-only handlers.
pub struct GroupedFabric {
    pub fabric: Fabric,
    pub summary: GroupingSummary,
}

/// Load the snapshot behind `source` and run one grouping pass over it.
pub fn load_grouped(
    source: &FabricSource,
    options: &GroupingOptions,
) -> Result<GroupedFabric, CliError> {
    let snapshot_err = |source_err| CliError::Snapshot {
        path: source.path.clone(),
        source: source_err,
    };

    debug!(
        path = %source.path.display(),
        profile = source.profile.as_deref().unwrap_or("-"),
        "loading fabric"
    );
    let snapshot = FabricSnapshot::load(&source.path, source.format).map_err(snapshot_err)?;
    let mut fabric = Fabric::from_snapshot(&snapshot).map_err(snapshot_err)?;
    let summary = group_nodes(&mut fabric, options)?;

    Ok(GroupedFabric { fabric, summary })
}

/// Parse a node GUID given on the command line.
pub fn parse_guid(text: &str) -> Result<Guid, CliError> {
    text.parse().map_err(|e| CliError::Validation {
        field: "guid".into(),
        reason: format!("'{text}' is not a GUID: {e}"),
    })
}

/// Resolve a GUID argument to a node of the fabric.
pub fn resolve_node(fabric: &Fabric, text: &str) -> Result<NodeId, CliError> {
    let guid = parse_guid(text)?;
    fabric.find_node(guid).ok_or_else(|| CliError::NotFound {
        resource_type: "node".into(),
        identifier: guid.to_string(),
        list_command: "nodes list".into(),
    })
}
