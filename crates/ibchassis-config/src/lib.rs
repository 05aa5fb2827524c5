//! Shared configuration for the ibchassis tools.
//!
//! TOML file plus `IBCHASSIS_*` environment overrides, named fabric
//! snapshot profiles, and translation to `ibchassis_core::GroupingOptions`.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ibchassis_core::{GroupingOptions, SnapshotFormat};

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "IBCHASSIS_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("fabric profile '{name}' not found")]
    UnknownFabric { name: String },

    #[error("no fabric given and no default_fabric configured")]
    NoFabric,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Fabric profile used when neither `--fabric` nor `--profile` is given.
    pub default_fabric: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Grouping tunables.
    #[serde(default)]
    pub grouping: GroupingOptions,

    /// Named fabric snapshots.
    #[serde(default)]
    pub fabrics: IndexMap<String, FabricProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// A named fabric snapshot on disk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FabricProfile {
    pub path: PathBuf,

    /// Snapshot encoding; guessed from the extension when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<SnapshotFormat>,
}

impl Config {
    pub fn grouping_options(&self) -> GroupingOptions {
        self.grouping
    }

    /// Look up a fabric profile by name, falling back to `default_fabric`.
    pub fn resolve_fabric(&self, name: Option<&str>) -> Result<(&str, &FabricProfile), ConfigError> {
        let name = name
            .or(self.default_fabric.as_deref())
            .ok_or(ConfigError::NoFabric)?;
        self.fabrics
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| ConfigError::UnknownFabric { name: name.into() })
    }

    /// Reject settings no run could use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, profile) in &self.fabrics {
            if profile.path.as_os_str().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("fabrics.{name}.path"),
                    reason: "must not be empty".into(),
                });
            }
        }
        if let Some(ref name) = self.default_fabric {
            if !self.fabrics.contains_key(name) {
                return Err(ConfigError::Validation {
                    field: "default_fabric".into(),
                    reason: format!("no fabric profile named '{name}'"),
                });
            }
        }
        Ok(())
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `$IBCHASSIS_CONFIG`, else the platform
/// config directory.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("org", "ibchassis", "ibchassis").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("ibchassis");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` + environment. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("IBCHASSIS_").ignore(&["CONFIG"]).split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Load config, returning a default if it is missing or unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
