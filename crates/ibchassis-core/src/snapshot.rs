// ── Fabric snapshots ──
//
// A discovered fabric serialized to JSON or YAML: node records with their
// hop bucket, plus the links between their ports. Loading a snapshot is
// the usual way to get a `Fabric` outside of a live discovery run.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::error::CoreError;
use crate::fabric::Fabric;
use crate::model::{Guid, NodeRecord, NodeType, Placement};

/// On-disk encoding of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SnapshotFormat {
    Json,
    #[strum(to_string = "yaml", serialize = "yml")]
    #[serde(alias = "yml")]
    Yaml,
}

impl SnapshotFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub guid: Guid,
    #[serde(deserialize_with = "int_or_hex")]
    pub vendor_id: u32,
    #[serde(deserialize_with = "int_or_hex")]
    pub device_id: u32,
    pub node_type: NodeType,
    #[serde(default)]
    pub system_image_guid: Guid,
    /// Number of ports, numbered `1..=ports`.
    pub ports: u8,
    /// Hop distance from the discovery root; absent for endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hops: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEnd {
    pub guid: Guid,
    pub port: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotLink {
    pub from: LinkEnd,
    pub to: LinkEnd,
    /// Only `from -> to` was discovered.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub one_way: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabricSnapshot {
    pub nodes: Vec<SnapshotNode>,
    #[serde(default)]
    pub links: Vec<SnapshotLink>,
}

fn int_or_hex<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(v) => Ok(v),
        Raw::Text(s) => {
            let t = s.trim();
            let parsed = match t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
                Some(hex) => u32::from_str_radix(hex, 16),
                None => t.parse(),
            };
            parsed.map_err(|e| serde::de::Error::custom(format!("invalid id '{s}': {e}")))
        }
    }
}

impl FabricSnapshot {
    pub fn from_json(text: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml(text: &str) -> Result<Self, CoreError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn parse(text: &str, format: SnapshotFormat) -> Result<Self, CoreError> {
        match format {
            SnapshotFormat::Json => Self::from_json(text),
            SnapshotFormat::Yaml => Self::from_yaml(text),
        }
    }

    /// Read a snapshot file. `format` overrides the extension.
    pub fn load(path: &Path, format: Option<SnapshotFormat>) -> Result<Self, CoreError> {
        let format = format
            .or_else(|| SnapshotFormat::from_path(path))
            .ok_or_else(|| CoreError::Snapshot {
                message: format!(
                    "cannot tell the format of '{}' from its extension",
                    path.display()
                ),
            })?;
        let text = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), %format, "loading fabric snapshot");
        Self::parse(&text, format)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Fabric {
    /// Build the arena from a snapshot. Nodes keep file order within each
    /// hop bucket.
    pub fn from_snapshot(snapshot: &FabricSnapshot) -> Result<Self, CoreError> {
        let mut fabric = Self::new();

        for node in &snapshot.nodes {
            let record = NodeRecord {
                vendor_id: node.vendor_id,
                device_id: node.device_id,
                node_type: node.node_type,
                system_image_guid: node.system_image_guid,
            };
            let placement = node.hops.map_or(Placement::Endpoint, Placement::Hops);
            fabric.add_node(node.guid, record, node.ports, placement)?;
        }

        for link in &snapshot.links {
            let from = fabric
                .find_node(link.from.guid)
                .ok_or(CoreError::NodeNotFound {
                    guid: link.from.guid,
                })?;
            let to = fabric
                .find_node(link.to.guid)
                .ok_or(CoreError::NodeNotFound { guid: link.to.guid })?;
            if link.one_way {
                fabric.connect_one_way(from, link.from.port, to, link.to.port)?;
            } else {
                fabric.connect(from, link.from.port, to, link.to.port)?;
            }
        }

        debug!(
            nodes = fabric.node_count(),
            links = snapshot.links.len(),
            "fabric built from snapshot"
        );
        Ok(fabric)
    }
}
