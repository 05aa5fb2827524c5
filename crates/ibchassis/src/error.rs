//! CLI error types with miette diagnostics.
//!
//! Maps core and config errors into user-facing errors with actionable help text.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use ibchassis_config::ConfigError;
use ibchassis_core::{CoreError, InvariantViolation};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const SNAPSHOT: i32 = 5;
    pub const INVARIANT: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Fabric input ─────────────────────────────────────────────────

    #[error("No fabric snapshot selected")]
    #[diagnostic(
        code(ibchassis::no_fabric),
        help(
            "Pass --fabric PATH, or register one with:\n  \
             ibchassis config add-fabric NAME PATH --default\n\
             Config file: {path}"
        )
    )]
    NoFabric { path: String },

    #[error("Could not load fabric snapshot {}", .path.display())]
    #[diagnostic(
        code(ibchassis::snapshot),
        help("Snapshots are JSON or YAML; use --format when the extension is neither.")
    )]
    Snapshot {
        path: PathBuf,
        #[source]
        source: CoreError,
    },

    // ── Grouping ─────────────────────────────────────────────────────

    #[error("Chassis grouping aborted")]
    #[diagnostic(
        code(ibchassis::invariant),
        help(
            "Node {guid} does not fit the known chassis wiring.\n\
             Re-run with -vv to trace the walk, or use --no-identity-grouping \
             to rule out identity grouping."
        )
    )]
    Invariant {
        guid: String,
        #[source]
        source: InvariantViolation,
    },

    // ── Lookups ──────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(ibchassis::not_found),
        help("Run: ibchassis {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ibchassis::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Fabric profile '{name}' not found in configuration")]
    #[diagnostic(
        code(ibchassis::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Add one with: ibchassis config add-fabric {name} PATH"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(ibchassis::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(ibchassis::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(ibchassis::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(ibchassis::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to render TOML: {0}")]
    #[diagnostic(code(ibchassis::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            Self::NoFabric { .. }
            | Self::ProfileNotFound { .. }
            | Self::ConfigExists { .. }
            | Self::Config(_) => exit_code::CONFIG,
            Self::Snapshot { .. } => exit_code::SNAPSHOT,
            Self::Invariant { .. } => exit_code::INVARIANT,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<InvariantViolation> for CliError {
    fn from(source: InvariantViolation) -> Self {
        Self::Invariant {
            guid: source.guid().to_string(),
            source,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ibchassis_core::Guid;

    #[test]
    fn invariant_gets_dedicated_exit_code() {
        let err: CliError = InvariantViolation::UnknownHardwareModel {
            guid: Guid::new(0x41),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::INVARIANT);
        assert!(matches!(err, CliError::Invariant { ref guid, .. } if guid == "0x0000000000000041"));
    }

    #[test]
    fn config_validation_is_a_usage_error() {
        let err: CliError = ConfigError::Validation {
            field: "default_fabric".into(),
            reason: "dangling".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::USAGE);
        let err: CliError = ConfigError::NoFabric.into();
        assert_eq!(err.exit_code(), exit_code::CONFIG);
    }
}
