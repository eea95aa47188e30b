use std::path::Path;
use std::process::Command;

use crate::error::{Result, RollbackError};
use crate::types::RunMode;
use crate::util::command::run_command;

/// The two btrfs-level operations the orchestrator needs. A trait seam so
/// repositioning failures can be injected in tests.
pub trait SubvolumeOps {
    /// Writable snapshot of `source` at `dest`.
    fn create_snapshot(&self, source: &Path, dest: &Path) -> Result<()>;
    /// Makes `path` the subvolume mounted when none is requested explicitly.
    fn set_default(&self, path: &Path) -> Result<()>;
}

/// Shells out to btrfs-progs, honoring dry-run.
pub struct BtrfsCli {
    run_mode: RunMode,
}

impl BtrfsCli {
    pub fn new(run_mode: RunMode) -> Self {
        Self { run_mode }
    }

    fn finish(&self, cmd: &mut Command, action: &str) -> Result<()> {
        let rc = run_command(cmd, self.run_mode)?;
        if rc != 0 {
            return Err(RollbackError::message(format!(
                "btrfs subvolume {} exited with code {}",
                action, rc
            )));
        }
        Ok(())
    }
}

impl SubvolumeOps for BtrfsCli {
    fn create_snapshot(&self, source: &Path, dest: &Path) -> Result<()> {
        let mut cmd = Command::new("btrfs");
        cmd.arg("subvolume").arg("snapshot").arg(source).arg(dest);
        self.finish(&mut cmd, "snapshot")
    }

    fn set_default(&self, path: &Path) -> Result<()> {
        let mut cmd = Command::new("btrfs");
        cmd.arg("subvolume").arg("set-default").arg(path);
        self.finish(&mut cmd, "set-default")
    }
}
