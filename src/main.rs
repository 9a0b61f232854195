//! @dose
//! purpose: CLI entry point for gavel. Loads gavel.toml, installs logging, registers the
//!     built-in command groups and hands the raw command line to the dispatcher.
//!
//! when-editing:
//!     - !All command behaviour lives in the gavel library; this file only wires it up
//!     - Config is read from the current working directory
//!
//! invariants:
//!     - The process exits with 0 when help was shown or the command completed, 1 otherwise
//!
//! do-not:
//!     - Never panic; setup failures are reported on stderr
//!
//! gotchas:
//!     - Dispatch errors were already logged by the dispatcher, so they are not printed again

use anyhow::Context;
use clap::Parser;
use gavel::commands::builtin_groups;
use gavel::dispatch::{DispatchError, Dispatcher};
use gavel::{logging, registry, Cli, Config, Registry};
use std::env;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let root = env::current_dir().context("Failed to get current directory")?;
    let config = Config::load(&root);

    let log = logging::init(config.logging.level).context("Failed to install logging")?;

    let registry = Registry::builder()
        .group_suffix(config.registry.group_suffix.as_str())
        .register_all(builtin_groups())
        .build()
        .context("Failed to register command groups")?;
    let registry = registry::install(registry).context("Failed to install command registry")?;

    let dispatcher = Dispatcher::new(registry)
        .with_bind_options(config.bind_options())
        .with_log_control(&log);

    let mut stdout = io::stdout();
    match dispatcher.run(&cli.tokens, &mut stdout) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e @ (DispatchError::Output(_) | DispatchError::Render(_))) => Err(e.into()),
        Err(_) => Ok(ExitCode::FAILURE),
    }
}
