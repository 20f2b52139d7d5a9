//! tapline -- command-line front end for the telemetry router.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tapline_core::config::TaplineConfig;
use tapline_core::error::TaplineError;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let loaded = load_config(cli.config.as_deref());

    let general = loaded
        .as_ref()
        .map(|config| config.general.clone())
        .unwrap_or_default();
    logging::init_tracing(&general, cli.log_level.as_deref())
        .map_err(|e| CliError::Config(e.to_string()))?;

    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::CheckConfig => {
            commands::check_config::execute(cli.config.as_deref(), &loaded, &writer)
        }
        Commands::Send(args) => commands::send::execute(args, &loaded?, &writer),
        Commands::Emit(args) => commands::emit::execute(args, &loaded?, &writer),
        Commands::Pipe(args) => commands::pipe::execute(args, &loaded?, &writer),
    }
}

/// Load the effective configuration.
///
/// With a path: file + env overrides + validation. Without one: defaults + env overrides + validation.
fn load_config(path: Option<&Path>) -> Result<TaplineConfig, TaplineError> {
    match path {
        Some(path) => TaplineConfig::load(path),
        None => {
            let mut config = TaplineConfig::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
    }
}
