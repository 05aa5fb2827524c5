//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, FabricProfile};
use crate::error::CliError;
use crate::output;

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &mut GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            config::apply_defaults(global, &cfg)?;
            let toml = toml::to_string_pretty(&cfg)?;
            let out = output::render_single(
                &global.output_format(),
                &cfg,
                |_| toml.trim_end().to_owned(),
                |c| c.default_fabric.clone().unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Init ────────────────────────────────────────────────────
        ConfigCommand::Init { force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            let written = config::save_config(&Config::default())?;
            if !global.quiet {
                eprintln!("✓ Wrote default configuration to {}", written.display());
            }
            Ok(())
        }

        // ── Add fabric ──────────────────────────────────────────────
        ConfigCommand::AddFabric {
            name,
            path,
            default,
        } => {
            let mut cfg = config::load_config_or_default();
            let profile = FabricProfile {
                path,
                format: global.format.map(config::snapshot_format),
            };
            let replaced = cfg.fabrics.insert(name.clone(), profile).is_some();
            if default || cfg.default_fabric.is_none() {
                cfg.default_fabric = Some(name.clone());
            }
            cfg.validate()?;
            config::save_config(&cfg)?;
            if !global.quiet {
                let verb = if replaced { "Updated" } else { "Added" };
                eprintln!("✓ {verb} fabric '{name}'");
            }
            Ok(())
        }
    }
}
