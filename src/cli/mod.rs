pub mod args;
pub mod commands;

use anyhow::Result;
use clap::Parser;

use crate::cli::args::Cli;
use crate::cli::commands::{exit_for_error, rollback};
use crate::types::RunMode;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let run_mode = RunMode {
        dry_run: cli.dry_run,
        verbose: cli.verbose,
    };
    if let Err(err) = rollback::run_rollback(&cli.config, cli.snap_id, run_mode) {
        exit_for_error(&err);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
