//! Clap derive structures for the `ibchassis` CLI.
//!
//! Kept free of workspace crates so `build.rs` can include it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ibchassis -- chassis layout of a discovered InfiniBand fabric
#[derive(Debug, Parser)]
#[command(
    name = "ibchassis",
    version,
    about = "Infer chassis membership and slot positions from an InfiniBand fabric snapshot",
    long_about = "Loads a discovered fabric (JSON or YAML snapshot), groups its nodes into\n\
        physical chassis and reports each module's slot, chip and front-panel ports.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Fabric snapshot file (overrides --profile)
    #[arg(long, short = 'f', env = "IBCHASSIS_FABRIC", global = true)]
    pub fabric: Option<PathBuf>,

    /// Named fabric from the config file
    #[arg(long, short = 'p', env = "IBCHASSIS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Snapshot encoding (guessed from the file extension by default)
    #[arg(long, global = true)]
    pub format: Option<SnapshotFormatArg>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "IBCHASSIS_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Only group by topology; skip system-image identity grouping
    #[arg(long, global = true)]
    pub no_identity_grouping: bool,
}

impl GlobalOpts {
    pub fn output_format(&self) -> OutputFormat {
        self.output.clone().unwrap_or(OutputFormat::Table)
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color.clone().unwrap_or(ColorMode::Auto)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SnapshotFormatArg {
    Json,
    #[value(alias = "yml")]
    Yaml,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect inferred chassis
    #[command(alias = "ch")]
    Chassis(ChassisArgs),

    /// Inspect fabric nodes and their slot positions
    #[command(alias = "n")]
    Nodes(NodesArgs),

    /// Show the internal to front-panel port map of a node
    Ports(PortsArgs),

    /// Grouping run statistics
    Summary,

    /// Manage configuration and fabric profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Chassis ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ChassisArgs {
    #[command(subcommand)]
    pub command: ChassisCommand,
}

#[derive(Debug, Subcommand)]
pub enum ChassisCommand {
    /// List every numbered chassis
    #[command(alias = "ls")]
    List,

    /// Show one chassis with its spine and line slots
    #[command(alias = "get")]
    Show {
        /// Chassis number (1-based, as listed)
        number: u32,
    },

    /// Print a chassis identifier (all zeros when unknown)
    Guid {
        /// Chassis number (1-based, as listed)
        number: u32,
    },
}

// ── Nodes ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NodesArgs {
    #[command(subcommand)]
    pub command: NodesCommand,
}

#[derive(Debug, Subcommand)]
pub enum NodesCommand {
    /// List every node with its chassis and slot
    #[command(alias = "ls")]
    List {
        /// Only nodes that belong to no chassis
        #[arg(long)]
        ungrouped: bool,
    },

    /// Show one node
    #[command(alias = "get")]
    Show {
        /// Node GUID (0x-prefixed hex or decimal)
        guid: String,
    },
}

// ── Ports ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PortsArgs {
    /// Node GUID (0x-prefixed hex or decimal)
    pub guid: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display current resolved configuration
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Register a named fabric snapshot
    AddFabric {
        /// Profile name
        name: String,

        /// Snapshot file
        path: PathBuf,

        /// Make this the default fabric
        #[arg(long)]
        default: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
