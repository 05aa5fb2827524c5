//! Bridges the shared config crate and the global CLI flags.
//!
//! Flags win over config values; config values win over built-in defaults.

use std::path::PathBuf;

use clap::ValueEnum;

pub use ibchassis_config::{
    Config, FabricProfile, config_path, load_config, load_config_or_default, save_config,
};
use ibchassis_config::ConfigError;
use ibchassis_core::{GroupingOptions, SnapshotFormat};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat, SnapshotFormatArg};
use crate::error::CliError;

/// Where the fabric snapshot comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FabricSource {
    pub path: PathBuf,
    pub format: Option<SnapshotFormat>,
    /// Profile name, when the path came from the config.
    pub profile: Option<String>,
}

/// Fill unset output/color flags from the config `[defaults]`.
pub fn apply_defaults(global: &mut GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    if global.output.is_none() {
        let format =
            OutputFormat::from_str(&cfg.defaults.output, true).map_err(|_| CliError::Validation {
                field: "defaults.output".into(),
                reason: format!(
                    "'{}' is not one of table, json, json-compact, yaml, plain",
                    cfg.defaults.output
                ),
            })?;
        global.output = Some(format);
    }
    if global.color.is_none() {
        let mode =
            ColorMode::from_str(&cfg.defaults.color, true).map_err(|_| CliError::Validation {
                field: "defaults.color".into(),
                reason: format!("'{}' is not one of auto, always, never", cfg.defaults.color),
            })?;
        global.color = Some(mode);
    }
    Ok(())
}

pub fn snapshot_format(arg: SnapshotFormatArg) -> SnapshotFormat {
    match arg {
        SnapshotFormatArg::Json => SnapshotFormat::Json,
        SnapshotFormatArg::Yaml => SnapshotFormat::Yaml,
    }
}

/// `--fabric` wins; otherwise `--profile` or the configured default.
pub fn resolve_fabric_source(global: &GlobalOpts, cfg: &Config) -> Result<FabricSource, CliError> {
    let format_flag = global.format.map(snapshot_format);

    if let Some(ref path) = global.fabric {
        return Ok(FabricSource {
            path: path.clone(),
            format: format_flag,
            profile: None,
        });
    }

    match cfg.resolve_fabric(global.profile.as_deref()) {
        Ok((name, profile)) => Ok(FabricSource {
            path: profile.path.clone(),
            format: format_flag.or(profile.format),
            profile: Some(name.to_owned()),
        }),
        Err(ConfigError::UnknownFabric { name }) => Err(CliError::ProfileNotFound {
            name,
            available: available_profiles(cfg),
        }),
        Err(ConfigError::NoFabric) => Err(CliError::NoFabric {
            path: config_path().display().to_string(),
        }),
        Err(other) => Err(other.into()),
    }
}

/// Config grouping options with `--no-identity-grouping` applied.
pub fn grouping_options(global: &GlobalOpts, cfg: &Config) -> GroupingOptions {
    let mut options = cfg.grouping_options();
    if global.no_identity_grouping {
        options.identity_grouping = false;
    }
    options
}

fn available_profiles(cfg: &Config) -> String {
    if cfg.fabrics.is_empty() {
        "(none)".into()
    } else {
        cfg.fabrics.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
