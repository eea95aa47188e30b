use std::process::Command;

use tracing::info;

use crate::error::{Result, RollbackError};
use crate::types::RunMode;

pub fn maybe_print_command(cmd: &Command, run_mode: RunMode) {
    if !run_mode.dry_run && !run_mode.verbose {
        return;
    }
    let program = cmd.get_program().to_string_lossy();
    let args: Vec<String> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().to_string())
        .collect();
    info!("{} {}", program, args.join(" "));
}

/// Runs a command and returns its exit code. In dry-run mode the command is
/// only printed and 0 is returned.
pub fn run_command(cmd: &mut Command, run_mode: RunMode) -> Result<i32> {
    maybe_print_command(cmd, run_mode);
    if run_mode.dry_run {
        return Ok(0);
    }
    let status = cmd.status().map_err(|e| {
        RollbackError::message(format!("{}: {}", cmd.get_program().to_string_lossy(), e))
    })?;
    Ok(status.code().unwrap_or(1))
}
