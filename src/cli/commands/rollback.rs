use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::info;

use crate::btrfs::BtrfsCli;
use crate::config::load_config;
use crate::error::Result;
use crate::lock;
use crate::rollback::{self, RollbackPlan};
use crate::types::{RunMode, SnapshotId};

const CONFIRM_TEXT: &str = "CONFIRM";

pub fn run_rollback(config_path: &Path, snap_id: SnapshotId, run_mode: RunMode) -> Result<()> {
    let cfg = load_config(config_path)?;
    let plan = RollbackPlan::from_config(cfg.root_section(), snap_id);

    let stdin = io::stdin();
    if !confirm(&mut stdin.lock(), snap_id)? {
        info!("bad confirmation, exiting");
        return Ok(());
    }

    let _lock = lock::acquire(run_mode)?;
    let subvol = BtrfsCli::new(run_mode);
    rollback::execute(&plan, &subvol, run_mode)?;
    Ok(())
}

/// The typed-confirmation gate. Anything but the exact confirmation string
/// (including EOF) declines; declining is not an error.
fn confirm(input: &mut impl BufRead, source: SnapshotId) -> Result<bool> {
    print!(
        "Are you SURE you want to rollback to snapshot {}? Type '{}' to continue: ",
        source, CONFIRM_TEXT
    );
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end() == CONFIRM_TEXT)
}
