mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose, cli.global.quiet);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, quiet: bool) {
    let filter = match (quiet, verbosity) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        mut global,
        command,
    } = cli;

    match command {
        // Config commands work without a fabric
        Command::Config(args) => commands::config_cmd::handle(args, &mut global),

        Command::Completions(args) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "ibchassis", &mut std::io::stdout());
            Ok(())
        }

        // Everything else reads a grouped fabric
        cmd => {
            let cfg = config::load_config()?;
            config::apply_defaults(&mut global, &cfg)?;
            let source = config::resolve_fabric_source(&global, &cfg)?;
            let options = config::grouping_options(&global, &cfg);
            let grouped = commands::util::load_grouped(&source, &options)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &grouped, &global)
        }
    }
}
